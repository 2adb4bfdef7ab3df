use crate::utils::apply_derives;
use proc_macro::TokenStream;
use quote::quote;
use syn::spanned::Spanned;
use syn::{Item, parse_macro_input};

/// #[entity_id] 宏实现
/// 仅支持 `struct X(String);` 形式的标识包装类型：
/// - 合并/追加派生：Default, Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash
/// - 提供 new/generate/as_str、Display、FromStr、AsRef<str>、From 等便捷实现
pub(crate) fn expand(attr: TokenStream, item: TokenStream) -> TokenStream {
    if !attr.is_empty() {
        return syn::Error::new(
            proc_macro2::Span::call_site(),
            "#[entity_id] takes no arguments",
        )
        .to_compile_error()
        .into();
    }
    let input = parse_macro_input!(item as Item);

    let mut st = match input {
        Item::Struct(s) => s,
        other => {
            return syn::Error::new(other.span(), "#[entity_id] only on struct")
                .to_compile_error()
                .into();
        }
    };

    let inner_is_string = match &st.fields {
        syn::Fields::Unnamed(f) if f.unnamed.len() == 1 => f
            .unnamed
            .iter()
            .next()
            .map(|field| match &field.ty {
                syn::Type::Path(p) => p
                    .path
                    .segments
                    .last()
                    .map(|s| s.ident == "String")
                    .unwrap_or(false),
                _ => false,
            })
            .unwrap_or(false),
        _ => false,
    };
    if !inner_is_string {
        return syn::Error::new(
            st.span(),
            "#[entity_id] supports only single-field String tuple struct, e.g., struct X(String);",
        )
        .to_compile_error()
        .into();
    }

    if !st.generics.params.is_empty() {
        return syn::Error::new(st.generics.span(), "#[entity_id] does not support generics")
            .to_compile_error()
            .into();
    }

    let required: Vec<syn::Path> = vec![
        syn::parse_quote!(Default),
        syn::parse_quote!(Clone),
        syn::parse_quote!(Debug),
        syn::parse_quote!(serde::Serialize),
        syn::parse_quote!(serde::Deserialize),
        syn::parse_quote!(PartialEq),
        syn::parse_quote!(Eq),
        syn::parse_quote!(Hash),
    ];
    apply_derives(&mut st.attrs, required);

    let ident = &st.ident;
    let vis = &st.vis;

    let out = quote! {
        #st

        impl #ident {
            #vis fn new(value: impl ::core::convert::Into<::std::string::String>) -> Self {
                Self(value.into())
            }

            /// 生成新的随机标识
            #vis fn generate() -> Self {
                Self(::petrack_domain::entity::new_entity_id())
            }

            #vis fn as_str(&self) -> &str { self.0.as_str() }
        }

        impl ::std::str::FromStr for #ident {
            type Err = ::core::convert::Infallible;
            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                ::std::result::Result::Ok(Self(s.to_owned()))
            }
        }

        impl ::std::fmt::Display for #ident {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl ::core::convert::AsRef<str> for #ident {
            fn as_ref(&self) -> &str { &self.0 }
        }

        impl ::core::convert::From<#ident> for ::std::string::String {
            fn from(value: #ident) -> Self { value.0 }
        }

        impl ::core::convert::From<::std::string::String> for #ident {
            fn from(value: ::std::string::String) -> Self { Self(value) }
        }

        impl ::core::convert::From<&str> for #ident {
            fn from(value: &str) -> Self { Self(value.to_owned()) }
        }
    };

    TokenStream::from(out)
}
