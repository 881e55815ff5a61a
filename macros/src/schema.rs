//! `schema!` — builds the phantom-typed `Schema` handle from a table/column
//! declaration list, entirely at compile time (no runtime table data, same
//! as `drizzle_core::schema::Schema` itself promises).
//!
//! Grammar:
//!
//! ```ignore
//! schema! {
//!     AppSchema {
//!         users { id: Number, name: String, email: String },
//!         departments { id: Number, name: String },
//!     }
//! }
//! ```

use proc_macro2::TokenStream;
use quote::quote;
use syn::parse::{Parse, ParseStream};
use syn::punctuated::Punctuated;
use syn::{braced, Ident, Token};

struct ColumnDecl {
    name: Ident,
    ty: Ident,
}

impl Parse for ColumnDecl {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let name: Ident = input.parse()?;
        input.parse::<Token![:]>()?;
        let ty: Ident = input.parse()?;
        Ok(ColumnDecl { name, ty })
    }
}

struct TableDecl {
    name: Ident,
    columns: Punctuated<ColumnDecl, Token![,]>,
}

impl Parse for TableDecl {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let name: Ident = input.parse()?;
        let content;
        braced!(content in input);
        let columns = content.parse_terminated(ColumnDecl::parse, Token![,])?;
        Ok(TableDecl { name, columns })
    }
}

struct SchemaInput {
    ident: Ident,
    tables: Punctuated<TableDecl, Token![,]>,
}

impl Parse for SchemaInput {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let ident: Ident = input.parse()?;
        let content;
        braced!(content in input);
        let tables = content.parse_terminated(TableDecl::parse, Token![,])?;
        Ok(SchemaInput { ident, tables })
    }
}

fn logical_type(ty: &Ident) -> syn::Result<TokenStream> {
    match ty.to_string().as_str() {
        "Number" => Ok(quote! { ::drizzle_types::LogicalType::Number }),
        "String" => Ok(quote! { ::drizzle_types::LogicalType::String }),
        "Boolean" => Ok(quote! { ::drizzle_types::LogicalType::Boolean }),
        "Null" => Ok(quote! { ::drizzle_types::LogicalType::Null }),
        "Undefined" => Ok(quote! { ::drizzle_types::LogicalType::Undefined }),
        other => Err(syn::Error::new_spanned(ty, format!("unknown column type `{other}`; expected Number, String, Boolean, Null, or Undefined"))),
    }
}

pub fn expand(input: TokenStream) -> syn::Result<TokenStream> {
    let input: SchemaInput = syn::parse2(input)?;
    let ident = &input.ident;

    let table_refs = input
        .tables
        .iter()
        .map(|table| {
            let name = table.name.to_string();
            let columns = table
                .columns
                .iter()
                .map(|col| {
                    let col_name = col.name.to_string();
                    let ty = logical_type(&col.ty)?;
                    Ok(quote! { (#col_name, #ty) })
                })
                .collect::<syn::Result<Vec<_>>>()?;
            Ok(quote! {
                ::drizzle_core::TableRef {
                    name: #name,
                    columns: &[#(#columns),*],
                }
            })
        })
        .collect::<syn::Result<Vec<_>>>()?;

    Ok(quote! {
        #[derive(Debug, Clone, Copy)]
        pub struct #ident;

        impl ::drizzle_core::Schema for #ident {
            const TABLES: &'static [::drizzle_core::TableRef] = &[#(#table_refs),*];
        }
    })
}
