// Copyright (c) the Arbor contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Derive macro backing `arbor`'s per-variant provider contract.
//!
//! `#[derive(NodeData)]` turns a plain struct with named fields into a node
//! variant: it generates the ordered property schema, by-name slot access,
//! and reconstruction-with-overrides that the engine consumes.
//!
//! # Field classification
//!
//! Classification happens at expansion time, from the declared type:
//!
//! | Declared type | Slot |
//! |---------------|------|
//! | `Node`        | required single child |
//! | `Option<Node>`| optional single child |
//! | `Vec<Node>`   | growable child list |
//! | `Box<[Node]>` | fixed-size child list (element replacement only) |
//! | anything else | non-structural leaf data |
//!
//! A public field whose type mentions `Node` without matching one of the
//! supported shapes is rejected with a compile error rather than silently
//! classified as data. Non-public fields never enter the structural model.
//!
//! # Attributes
//!
//! - `#[ast(readonly)]` — child slot without a write accessor; in-place
//!   edits fail, reconstruction may still override it.
//! - `#[ast(derived)]` — computed value, excluded from the structural model.
//! - `#[ast(link)]` — non-owning reference, excluded from the structural
//!   model.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{quote, ToTokens};
use syn::{
    parse_macro_input, Data, DeriveInput, Error, Fields, GenericArgument, PathArguments, Type,
    Visibility,
};

/// Derive `arbor::NodeData` for a non-generic struct with named fields.
///
/// The struct must also be `Clone + PartialEq + Debug`.
#[proc_macro_derive(NodeData, attributes(ast))]
pub fn derive_node_data(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input)
        .unwrap_or_else(Error::into_compile_error)
        .into()
}

#[derive(Clone, Copy, PartialEq)]
enum Shape {
    Child,
    OptionalChild,
    ChildList,
    FixedChildList,
    Data,
}

struct Slot {
    ident: syn::Ident,
    name: String,
    shape: Shape,
    mutable: bool,
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let ident = &input.ident;
    let kind = ident.to_string();

    if !input.generics.params.is_empty() {
        return Err(Error::new_spanned(
            &input.generics,
            "NodeData cannot be derived for generic types",
        ));
    }

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(Error::new_spanned(
                    ident,
                    "NodeData requires a struct with named fields",
                ))
            }
        },
        _ => {
            return Err(Error::new_spanned(
                ident,
                "NodeData can only be derived for structs",
            ))
        }
    };

    let mut slots = Vec::new();
    for field in fields {
        let field_ident = field.ident.clone().expect("named field");

        let mut derived = false;
        let mut link = false;
        let mut readonly = false;
        for attr in &field.attrs {
            if !attr.path().is_ident("ast") {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("derived") {
                    derived = true;
                    Ok(())
                } else if meta.path.is_ident("link") {
                    link = true;
                    Ok(())
                } else if meta.path.is_ident("readonly") {
                    readonly = true;
                    Ok(())
                } else {
                    Err(meta.error("expected `derived`, `link`, or `readonly`"))
                }
            })?;
        }

        // Exclusion rules: derived values, links, and non-public fields stay
        // outside the structural model. They are still copied verbatim by
        // reconstruction and participate in equality via the struct's own
        // `PartialEq`.
        let public = matches!(field.vis, Visibility::Public(_));
        if derived || link || !public {
            if readonly {
                return Err(Error::new_spanned(
                    field,
                    "`readonly` only applies to public child slots",
                ));
            }
            continue;
        }

        let shape = match classify(&field.ty) {
            Some(shape) => shape,
            None if mentions_node(&field.ty) => {
                return Err(Error::new_spanned(
                    &field.ty,
                    "cannot classify declared type: node-holding fields must be \
                     `Node`, `Option<Node>`, `Vec<Node>`, or `Box<[Node]>`",
                ))
            }
            None => Shape::Data,
        };
        if readonly && shape == Shape::Data {
            return Err(Error::new_spanned(
                field,
                "`readonly` only applies to child slots",
            ));
        }

        slots.push(Slot {
            name: field_ident.to_string(),
            ident: field_ident,
            shape,
            mutable: shape != Shape::Data && !readonly,
        });
    }

    let mut spec_entries = Vec::new();
    let mut get_arms = Vec::new();
    let mut set_arms = Vec::new();
    let mut override_arms = Vec::new();

    for slot in &slots {
        let field = &slot.ident;
        let name = &slot.name;
        let mutable = slot.mutable;
        let kind_name = kind.as_str();

        let slot_kind = match slot.shape {
            Shape::Child => quote!(::arbor::SlotKind::Child),
            Shape::OptionalChild => quote!(::arbor::SlotKind::OptionalChild),
            Shape::ChildList => quote!(::arbor::SlotKind::ChildList),
            Shape::FixedChildList => quote!(::arbor::SlotKind::FixedChildList),
            Shape::Data => quote!(::arbor::SlotKind::Data),
        };
        spec_entries.push(quote! {
            ::arbor::PropertySpec {
                name: #name,
                kind: #slot_kind,
                mutable: #mutable,
            }
        });

        match slot.shape {
            Shape::Child => {
                get_arms.push(quote! {
                    #name => ::core::option::Option::Some(
                        ::arbor::PropertyValue::Node(self.#field.clone()),
                    ),
                });
                set_arms.push(if mutable {
                    quote! {
                        #name => match value {
                            ::arbor::PropertyValue::Node(node) => {
                                self.#field = node;
                                ::core::result::Result::Ok(())
                            }
                            other => ::core::result::Result::Err(
                                ::arbor::TreeError::unsupported_shape(
                                    #kind_name,
                                    #name,
                                    ::std::format!(
                                        "cannot write {} into a single-child slot",
                                        other.shape_name(),
                                    ),
                                ),
                            ),
                        },
                    }
                } else {
                    quote! {
                        #name => ::core::result::Result::Err(
                            ::arbor::TreeError::immutable(#kind_name, #name),
                        ),
                    }
                });
                override_arms.push(quote! {
                    #name => match value {
                        ::arbor::PropertyValue::Node(node) => next.#field = node.clone(),
                        other => {
                            return ::core::result::Result::Err(
                                ::arbor::TreeError::unsupported_shape(
                                    #kind_name,
                                    #name,
                                    ::std::format!("override value is {}", other.shape_name()),
                                ),
                            )
                        }
                    },
                });
            }
            Shape::OptionalChild => {
                get_arms.push(quote! {
                    #name => ::core::option::Option::Some(match &self.#field {
                        ::core::option::Option::Some(node) => {
                            ::arbor::PropertyValue::Node(node.clone())
                        }
                        ::core::option::Option::None => ::arbor::PropertyValue::Empty,
                    }),
                });
                set_arms.push(if mutable {
                    quote! {
                        #name => match value {
                            ::arbor::PropertyValue::Node(node) => {
                                self.#field = ::core::option::Option::Some(node);
                                ::core::result::Result::Ok(())
                            }
                            ::arbor::PropertyValue::Empty => {
                                self.#field = ::core::option::Option::None;
                                ::core::result::Result::Ok(())
                            }
                            other => ::core::result::Result::Err(
                                ::arbor::TreeError::unsupported_shape(
                                    #kind_name,
                                    #name,
                                    ::std::format!(
                                        "cannot write {} into a single-child slot",
                                        other.shape_name(),
                                    ),
                                ),
                            ),
                        },
                    }
                } else {
                    quote! {
                        #name => ::core::result::Result::Err(
                            ::arbor::TreeError::immutable(#kind_name, #name),
                        ),
                    }
                });
                override_arms.push(quote! {
                    #name => match value {
                        ::arbor::PropertyValue::Node(node) => {
                            next.#field = ::core::option::Option::Some(node.clone())
                        }
                        ::arbor::PropertyValue::Empty => {
                            next.#field = ::core::option::Option::None
                        }
                        other => {
                            return ::core::result::Result::Err(
                                ::arbor::TreeError::unsupported_shape(
                                    #kind_name,
                                    #name,
                                    ::std::format!("override value is {}", other.shape_name()),
                                ),
                            )
                        }
                    },
                });
            }
            Shape::ChildList => {
                get_arms.push(quote! {
                    #name => ::core::option::Option::Some(
                        ::arbor::PropertyValue::Nodes(self.#field.clone()),
                    ),
                });
                set_arms.push(if mutable {
                    quote! {
                        #name => match value {
                            ::arbor::PropertyValue::Nodes(nodes) => {
                                self.#field = nodes;
                                ::core::result::Result::Ok(())
                            }
                            other => ::core::result::Result::Err(
                                ::arbor::TreeError::unsupported_shape(
                                    #kind_name,
                                    #name,
                                    ::std::format!(
                                        "cannot write {} into a child list slot",
                                        other.shape_name(),
                                    ),
                                ),
                            ),
                        },
                    }
                } else {
                    quote! {
                        #name => ::core::result::Result::Err(
                            ::arbor::TreeError::immutable(#kind_name, #name),
                        ),
                    }
                });
                override_arms.push(quote! {
                    #name => match value {
                        ::arbor::PropertyValue::Nodes(nodes) => next.#field = nodes.clone(),
                        other => {
                            return ::core::result::Result::Err(
                                ::arbor::TreeError::unsupported_shape(
                                    #kind_name,
                                    #name,
                                    ::std::format!("override value is {}", other.shape_name()),
                                ),
                            )
                        }
                    },
                });
            }
            Shape::FixedChildList => {
                get_arms.push(quote! {
                    #name => ::core::option::Option::Some(
                        ::arbor::PropertyValue::Nodes(self.#field.to_vec()),
                    ),
                });
                set_arms.push(if mutable {
                    quote! {
                        #name => match value {
                            ::arbor::PropertyValue::Nodes(nodes) => {
                                if nodes.len() == self.#field.len() {
                                    self.#field = nodes.into_boxed_slice();
                                    ::core::result::Result::Ok(())
                                } else {
                                    ::core::result::Result::Err(
                                        ::arbor::TreeError::unsupported_shape(
                                            #kind_name,
                                            #name,
                                            ::std::format!(
                                                "fixed-size child list holds {} nodes, cannot resize to {}",
                                                self.#field.len(),
                                                nodes.len(),
                                            ),
                                        ),
                                    )
                                }
                            }
                            other => ::core::result::Result::Err(
                                ::arbor::TreeError::unsupported_shape(
                                    #kind_name,
                                    #name,
                                    ::std::format!(
                                        "cannot write {} into a child list slot",
                                        other.shape_name(),
                                    ),
                                ),
                            ),
                        },
                    }
                } else {
                    quote! {
                        #name => ::core::result::Result::Err(
                            ::arbor::TreeError::immutable(#kind_name, #name),
                        ),
                    }
                });
                override_arms.push(quote! {
                    #name => match value {
                        ::arbor::PropertyValue::Nodes(nodes) => {
                            next.#field = nodes.clone().into_boxed_slice()
                        }
                        other => {
                            return ::core::result::Result::Err(
                                ::arbor::TreeError::unsupported_shape(
                                    #kind_name,
                                    #name,
                                    ::std::format!("override value is {}", other.shape_name()),
                                ),
                            )
                        }
                    },
                });
            }
            Shape::Data => {
                get_arms.push(quote! {
                    #name => ::core::option::Option::Some(
                        ::arbor::PropertyValue::Data(::std::format!("{:?}", self.#field)),
                    ),
                });
                // Leaf data has no structural write accessor; reconstruction
                // copies it verbatim, so there is no override arm either.
                set_arms.push(quote! {
                    #name => ::core::result::Result::Err(
                        ::arbor::TreeError::immutable(#kind_name, #name),
                    ),
                });
            }
        }
    }

    let kind_name = kind.as_str();
    Ok(quote! {
        #[automatically_derived]
        #[allow(unused_variables, unused_mut, clippy::match_single_binding, clippy::never_loop)]
        impl ::arbor::NodeData for #ident {
            fn kind(&self) -> &'static str {
                #kind_name
            }

            fn specs(&self) -> &'static [::arbor::PropertySpec] {
                const SPECS: &[::arbor::PropertySpec] = &[#(#spec_entries),*];
                SPECS
            }

            fn get(&self, name: &str) -> ::core::option::Option<::arbor::PropertyValue> {
                match name {
                    #(#get_arms)*
                    _ => ::core::option::Option::None,
                }
            }

            fn set(
                &mut self,
                name: &str,
                value: ::arbor::PropertyValue,
            ) -> ::core::result::Result<(), ::arbor::TreeError> {
                match name {
                    #(#set_arms)*
                    _ => ::core::result::Result::Err(
                        ::arbor::TreeError::unknown_property(#kind_name, name),
                    ),
                }
            }

            fn with_overrides(
                &self,
                overrides: &[(&str, ::arbor::PropertyValue)],
            ) -> ::core::result::Result<::std::boxed::Box<dyn ::arbor::NodeData>, ::arbor::TreeError>
            {
                let mut next = self.clone();
                for (name, value) in overrides {
                    match *name {
                        #(#override_arms)*
                        other => {
                            return ::core::result::Result::Err(
                                ::arbor::TreeError::unknown_property(#kind_name, other),
                            )
                        }
                    }
                }
                ::core::result::Result::Ok(::std::boxed::Box::new(next))
            }

            fn eq_data(&self, other: &dyn ::arbor::NodeData) -> bool {
                other
                    .as_any()
                    .downcast_ref::<Self>()
                    .is_some_and(|other| self == other)
            }

            fn as_any(&self) -> &dyn ::core::any::Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn ::core::any::Any {
                self
            }
        }
    })
}

/// Map a declared field type to its slot shape, or `None` for leaf data.
fn classify(ty: &Type) -> Option<Shape> {
    if is_node(ty) {
        return Some(Shape::Child);
    }
    if let Some(inner) = wrapped(ty, "Option") {
        if is_node(inner) {
            return Some(Shape::OptionalChild);
        }
    }
    if let Some(inner) = wrapped(ty, "Vec") {
        if is_node(inner) {
            return Some(Shape::ChildList);
        }
    }
    if let Some(inner) = wrapped(ty, "Box") {
        if let Type::Slice(slice) = inner {
            if is_node(&slice.elem) {
                return Some(Shape::FixedChildList);
            }
        }
    }
    None
}

fn is_node(ty: &Type) -> bool {
    match ty {
        Type::Path(path) if path.qself.is_none() => path
            .path
            .segments
            .last()
            .is_some_and(|segment| segment.ident == "Node" && segment.arguments.is_none()),
        _ => false,
    }
}

/// The single type argument of `wrapper<...>`, if `ty` has that form.
fn wrapped<'a>(ty: &'a Type, wrapper: &str) -> Option<&'a Type> {
    let Type::Path(path) = ty else { return None };
    if path.qself.is_some() {
        return None;
    }
    let segment = path.path.segments.last()?;
    if segment.ident != wrapper {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    if args.args.len() != 1 {
        return None;
    }
    match args.args.first()? {
        GenericArgument::Type(inner) => Some(inner),
        _ => None,
    }
}

/// Whether the type's token stream contains the bare identifier `Node`.
fn mentions_node(ty: &Type) -> bool {
    fn scan(stream: TokenStream2) -> bool {
        stream.into_iter().any(|tree| match tree {
            proc_macro2::TokenTree::Ident(ident) => ident == "Node",
            proc_macro2::TokenTree::Group(group) => scan(group.stream()),
            _ => false,
        })
    }
    scan(ty.to_token_stream())
}
