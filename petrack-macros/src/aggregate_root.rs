use crate::utils::{derives_serde, has_field_named};
use proc_macro::TokenStream;
use quote::quote;
use syn::spanned::Spanned;
use syn::{Item, Result, Type, parse::Parse, parse::ParseStream, parse_macro_input};

/// #[aggregate_root] 宏实现
/// - 追加私有字段 `domain_events: DomainEvents<Ev>`（置于字段末尾）
/// - 自动实现 `::petrack_domain::aggregate::AggregateRoot`
/// - 参数：`#[aggregate_root(event = EventType)]`（必填）
/// - 若结构体派生 serde（或同时标注了 `#[entity]`），待发布事件不参与序列化
pub(crate) fn expand(attr: TokenStream, item: TokenStream) -> TokenStream {
    let cfg = parse_macro_input!(attr as AggregateRootAttrConfig);
    let input = parse_macro_input!(item as Item);

    let mut st = match input {
        Item::Struct(s) => s,
        other => {
            return syn::Error::new(other.span(), "#[aggregate_root] only on struct")
                .to_compile_error()
                .into();
        }
    };

    // `#[entity]` 在本宏之后展开并派生 serde，同样需要跳过该字段
    let skip_serde = derives_serde(&st.attrs)
        || st.attrs.iter().any(|a| {
            a.path()
                .segments
                .last()
                .map(|s| s.ident == "entity")
                .unwrap_or(false)
        });

    let fields_named = match &mut st.fields {
        syn::Fields::Named(f) => f,
        _ => {
            return syn::Error::new(st.span(), "only supports named-field struct")
                .to_compile_error()
                .into();
        }
    };

    if has_field_named(&fields_named.named, "domain_events") {
        return syn::Error::new(
            fields_named.span(),
            "field `domain_events` is reserved by #[aggregate_root]",
        )
        .to_compile_error()
        .into();
    }

    let event_ty = &cfg.event_ty;
    let field: syn::Field = if skip_serde {
        syn::parse_quote! {
            #[serde(skip)]
            domain_events: ::petrack_domain::aggregate::DomainEvents<#event_ty>
        }
    } else {
        syn::parse_quote! {
            domain_events: ::petrack_domain::aggregate::DomainEvents<#event_ty>
        }
    };
    fields_named.named.push(field);

    let ident = &st.ident;
    let generics = st.generics.clone();
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let expanded = quote! {
        #st

        impl #impl_generics ::petrack_domain::aggregate::AggregateRoot for #ident #ty_generics #where_clause {
            type Event = #event_ty;

            fn domain_events(&self) -> &::petrack_domain::aggregate::DomainEvents<Self::Event> {
                &self.domain_events
            }

            fn domain_events_mut(&mut self) -> &mut ::petrack_domain::aggregate::DomainEvents<Self::Event> {
                &mut self.domain_events
            }
        }
    };

    TokenStream::from(expanded)
}

// -------- parsing --------

struct AggregateRootAttrConfig {
    event_ty: Type,
}

impl Parse for AggregateRootAttrConfig {
    fn parse(input: ParseStream) -> Result<Self> {
        if input.is_empty() {
            return Err(syn::Error::new(
                proc_macro2::Span::call_site(),
                "missing required key 'event', e.g. #[aggregate_root(event = MyEvent)]",
            ));
        }

        let key: syn::Ident = input.parse()?;
        if key != "event" {
            return Err(syn::Error::new(
                key.span(),
                "unknown key in attribute; expected 'event'",
            ));
        }
        let _eq: syn::Token![=] = input.parse()?;
        let event_ty: Type = input.parse()?;

        if !input.is_empty() {
            let _comma: syn::Token![,] = input.parse()?;
            if !input.is_empty() {
                return Err(input.error("unexpected tokens after 'event = ...'"));
            }
        }

        Ok(Self { event_ty })
    }
}
