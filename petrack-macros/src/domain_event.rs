use crate::utils::{apply_derives, ensure_leading_fields, to_snake_case};
use proc_macro::TokenStream;
use quote::{ToTokens, format_ident, quote};
use std::collections::HashMap;
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{Expr, Ident, Item, Result, Token, Type, parse::Parse, parse::ParseStream, parse_macro_input};

/// #[domain_event] 宏实现
/// - 仅支持具名字段变体：`Variant { .. }`
/// - 确保每个变体具备字段：`metadata: EventMetadata`（缺失时插入到最前）
/// - 生成同名 `XxxKind` 判别枚举（Copy + Eq + Hash），作为总线的分发键
/// - 生成 `::petrack_domain::domain_event::DomainEvent` 与 `EventKind` 实现
/// - 为每个变体生成蛇形命名的构造函数，自动填充事件元数据
/// - 支持：`#[domain_event(version = N)]`（枚举级默认 schema 版本）
/// - 变体可覆写：`#[event(event_type = "...", event_version = N)]`
pub(crate) fn expand(attr: TokenStream, item: TokenStream) -> TokenStream {
    let cfg = parse_macro_input!(attr as EventAttrConfig);
    let mut input = parse_macro_input!(item as Item);

    let enum_item = match &mut input {
        Item::Enum(e) => e,
        other => {
            return syn::Error::new(
                other.span(),
                "#[domain_event] can only be used on enum types",
            )
            .to_compile_error()
            .into();
        }
    };

    if !enum_item.generics.params.is_empty() {
        return syn::Error::new(
            enum_item.generics.span(),
            "#[domain_event] does not support generic enums",
        )
        .to_compile_error()
        .into();
    }

    let version_lit = cfg.version.unwrap_or_else(|| syn::parse_quote! { 1 });

    // 合并/追加默认派生：Debug, Clone, PartialEq, Serialize, Deserialize
    let required: Vec<syn::Path> = vec![
        syn::parse_quote!(Debug),
        syn::parse_quote!(Clone),
        syn::parse_quote!(PartialEq),
        syn::parse_quote!(serde::Serialize),
        syn::parse_quote!(serde::Deserialize),
    ];
    apply_derives(&mut enum_item.attrs, required);

    let mut variant_types: HashMap<String, syn::LitStr> = HashMap::new();
    let mut variant_versions: HashMap<String, syn::LitInt> = HashMap::new();
    let metadata_ty: Type = syn::parse_quote! { ::petrack_domain::domain_event::EventMetadata };

    for v in &mut enum_item.variants {
        let span = v.span();
        let fields_named = match &mut v.fields {
            syn::Fields::Named(f) => f,
            _ => {
                return syn::Error::new(
                    span,
                    "#[domain_event] supports only named-field enum variants, e.g., Variant { x: T }",
                )
                .to_compile_error()
                .into();
            }
        };

        ensure_leading_fields(fields_named, &[("metadata", &metadata_ty)]);

        let mut retained_attrs = Vec::new();
        let mut type_lit: Option<syn::LitStr> = None;
        let mut version_lit_local: Option<syn::LitInt> = None;

        for attr in v.attrs.iter() {
            if !attr.path().is_ident("event") {
                retained_attrs.push(attr.clone());
                continue;
            }
            let vc = match parse_variant_event_attr(attr) {
                Ok(vc) => vc,
                Err(err) => return err.to_compile_error().into(),
            };
            if let Some(lit) = vc.ty {
                if type_lit.replace(lit).is_some() {
                    return syn::Error::new(
                        attr.span(),
                        "duplicate 'event_type' specified for this variant",
                    )
                    .to_compile_error()
                    .into();
                }
            }
            if let Some(lit) = vc.version {
                if version_lit_local.replace(lit).is_some() {
                    return syn::Error::new(
                        attr.span(),
                        "duplicate 'event_version' specified for this variant",
                    )
                    .to_compile_error()
                    .into();
                }
            }
        }

        v.attrs = retained_attrs;
        if let Some(lit) = type_lit {
            variant_types.insert(v.ident.to_string(), lit);
        }
        if let Some(lit) = version_lit_local {
            variant_versions.insert(v.ident.to_string(), lit);
        }
    }

    let enum_ident = &enum_item.ident;
    let vis = &enum_item.vis;
    let kind_ident = format_ident!("{}Kind", enum_ident);
    let kind_doc = format!("`{enum_ident}` 的事件类型判别值（总线按其精确分发）");

    let variant_idents: Vec<&Ident> = enum_item.variants.iter().map(|v| &v.ident).collect();

    let name_arms = variant_idents.iter().map(|v_ident| {
        let key = v_ident.to_string();
        let lit = variant_types
            .get(&key)
            .cloned()
            .unwrap_or_else(|| syn::LitStr::new(&key, v_ident.span()));
        quote! { Self::#v_ident => #lit }
    });

    let ver_arms = variant_idents.iter().map(|v_ident| {
        let lit = variant_versions
            .get(&v_ident.to_string())
            .unwrap_or(&version_lit);
        quote! { Self::#v_ident => #lit }
    });

    let kind_arms = variant_idents.iter().map(|v_ident| {
        quote! { Self::#v_ident { .. } => #kind_ident::#v_ident }
    });

    let metadata_arms = variant_idents.iter().map(|v_ident| {
        quote! { Self::#v_ident { metadata, .. } => metadata }
    });

    // 每个变体的构造函数：参数为除 metadata 之外的全部字段（保持声明顺序）
    let constructors = enum_item.variants.iter().map(|v| {
        let v_ident = &v.ident;
        let fn_ident = format_ident!("{}", to_snake_case(&v_ident.to_string()));
        let doc = format!("构造 `{v_ident}` 事件（生成新的事件 ID 与发生时间）");
        let fields: Vec<(&Ident, &Type)> = match &v.fields {
            syn::Fields::Named(named) => named
                .named
                .iter()
                .filter_map(|f| f.ident.as_ref().map(|i| (i, &f.ty)))
                .filter(|(i, _)| *i != "metadata")
                .collect(),
            _ => Vec::new(),
        };
        let params = fields.iter().map(|(i, ty)| quote! { #i: #ty });
        let inits = fields.iter().map(|(i, _)| quote! { #i });
        quote! {
            #[doc = #doc]
            #vis fn #fn_ident(#(#params),*) -> Self {
                Self::#v_ident {
                    metadata: ::petrack_domain::domain_event::EventMetadata::new(
                        ::petrack_domain::domain_event::EventKind::schema_version(&#kind_ident::#v_ident),
                    ),
                    #(#inits,)*
                }
            }
        }
    });

    let out = quote! {
        #enum_item

        #[doc = #kind_doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        #vis enum #kind_ident {
            #( #variant_idents, )*
        }

        impl #kind_ident {
            /// 全部事件类型（声明顺序）
            #vis const ALL: &'static [#kind_ident] = &[ #( #kind_ident::#variant_idents, )* ];
        }

        impl ::petrack_domain::domain_event::EventKind for #kind_ident {
            fn name(&self) -> &'static str { match self { #( #name_arms, )* } }
            fn schema_version(&self) -> u32 { match self { #( #ver_arms, )* } }
        }

        impl ::std::fmt::Display for #kind_ident {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(::petrack_domain::domain_event::EventKind::name(self))
            }
        }

        impl ::petrack_domain::domain_event::DomainEvent for #enum_ident {
            type Kind = #kind_ident;

            fn kind(&self) -> Self::Kind { match self { #( #kind_arms, )* } }

            fn metadata(&self) -> &::petrack_domain::domain_event::EventMetadata {
                match self { #( #metadata_arms, )* }
            }
        }

        impl #enum_ident {
            #( #constructors )*
        }
    };

    TokenStream::from(out)
}

// -------- utils & parsing --------

struct VariantEventAttrConfig {
    ty: Option<syn::LitStr>,
    version: Option<syn::LitInt>,
}

fn parse_variant_event_attr(attr: &syn::Attribute) -> Result<VariantEventAttrConfig> {
    if !matches!(attr.meta, syn::Meta::List(_)) {
        return Err(syn::Error::new(attr.span(), "expected #[event(...)]"));
    }

    let mut ty: Option<syn::LitStr> = None;
    let mut version: Option<syn::LitInt> = None;
    let pairs: Punctuated<VariantEventAttrKv, Token![,]> =
        attr.parse_args_with(Punctuated::<VariantEventAttrKv, Token![,]>::parse_terminated)?;

    for kv in pairs {
        match kv.key.to_string().as_str() {
            "event_type" => {
                if ty.is_some() {
                    return Err(syn::Error::new(
                        kv.key.span(),
                        "duplicate key 'event_type' in attribute",
                    ));
                }
                let lit = match kv.value {
                    Expr::Lit(syn::ExprLit {
                        lit: syn::Lit::Str(lit),
                        ..
                    }) => lit,
                    other => {
                        return Err(syn::Error::new(
                            other.span(),
                            "expected string literal for 'event_type'",
                        ));
                    }
                };
                ty = Some(lit);
            }
            "event_version" => {
                if version.is_some() {
                    return Err(syn::Error::new(
                        kv.key.span(),
                        "duplicate key 'event_version' in attribute",
                    ));
                }
                let lit = match kv.value {
                    Expr::Lit(syn::ExprLit {
                        lit: syn::Lit::Int(lit),
                        ..
                    }) => lit,
                    other => {
                        return Err(syn::Error::new(
                            other.span(),
                            "expected integer literal for 'event_version'",
                        ));
                    }
                };
                version = Some(lit);
            }
            _ => {
                return Err(syn::Error::new(
                    kv.key.span(),
                    "unknown key; expected 'event_type' | 'event_version'",
                ));
            }
        }
    }

    Ok(VariantEventAttrConfig { ty, version })
}

struct VariantEventAttrKv {
    key: Ident,
    value: Expr,
}

impl Parse for VariantEventAttrKv {
    fn parse(input: ParseStream) -> Result<Self> {
        let key: Ident = input.parse()?;
        let _eq: Token![=] = input.parse()?;
        let value: Expr = input.parse()?;
        Ok(Self { key, value })
    }
}

// 枚举级配置：默认 schema 版本号
struct EventAttrConfig {
    version: Option<syn::LitInt>,
}

impl Parse for EventAttrConfig {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut version: Option<syn::LitInt> = None;

        if input.is_empty() {
            return Ok(Self { version });
        }

        let pairs: Punctuated<syn::ExprAssign, Token![,]> =
            Punctuated::<syn::ExprAssign, Token![,]>::parse_terminated(input)?;

        for assign in pairs.into_iter() {
            let key_ident = match *assign.left {
                syn::Expr::Path(p) if p.path.segments.len() == 1 => {
                    p.path.segments[0].ident.clone()
                }
                other => return Err(syn::Error::new(other.span(), "invalid attribute key")),
            };
            match key_ident.to_string().as_str() {
                "version" => {
                    if version.is_some() {
                        return Err(syn::Error::new(
                            key_ident.span(),
                            "duplicate key 'version' in attribute",
                        ));
                    }
                    let lit: syn::LitInt = syn::parse2(assign.right.to_token_stream())?;
                    version = Some(lit);
                }
                _ => {
                    return Err(syn::Error::new(
                        key_ident.span(),
                        "unknown key; expected 'version'",
                    ));
                }
            }
        }

        Ok(Self { version })
    }
}
