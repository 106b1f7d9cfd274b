use super::{EmittedArtifact, Emitter, ValueSetArtifact};
use crate::error::{GenError, Result};
use heck::ToSnakeCase;
use proc_macro2::TokenStream;
use quote::quote;
use std::fs;
use std::path::Path;

/// Writes one `const`-data module per ValueSet plus a `mod.rs` index.
#[derive(Debug, Clone, Default)]
pub struct RustEmitter;

impl RustEmitter {
    pub fn new() -> Self {
        Self
    }

    fn type_ident(&self, name: &str) -> Result<syn::Ident> {
        syn::parse_str::<syn::Ident>(name).map_err(|_| GenError::InvalidIdentifier {
            name: name.to_string(),
            target: self.target(),
        })
    }
}

/// snake_case module name for a ValueSet `name`.
pub(crate) fn module_name(name: &str) -> String {
    let mut s = name.to_snake_case();
    // Must not start with a digit for a Rust module name.
    if s.chars().next().map(|c| c.is_ascii_digit()).unwrap_or(false) {
        s = format!("vs_{}", s);
    }
    s
}

impl Emitter for RustEmitter {
    fn target(&self) -> &'static str {
        "Rust"
    }

    fn file_name(&self, value_set_name: &str) -> Result<String> {
        self.type_ident(value_set_name)?;
        let module = module_name(value_set_name);
        if syn::parse_str::<syn::Ident>(&module).is_err() {
            return Err(GenError::InvalidIdentifier {
                name: module,
                target: "Rust module",
            });
        }
        Ok(format!("{}.rs", module))
    }

    fn render(&self, artifact: &ValueSetArtifact<'_>) -> Result<String> {
        let type_ident = self.type_ident(artifact.name)?;
        let tokens = value_set_tokens(&type_ident, artifact);

        let file_ast: syn::File = syn::parse2(tokens).map_err(|e| GenError::Render {
            name: artifact.name.to_string(),
            message: e.to_string(),
        })?;

        let mut src = String::new();
        src.push_str("// @generated by vrdr-valueset-gen\n");
        src.push_str("// DO NOT EDIT MANUALLY\n\n");
        src.push_str(&prettyplease::unparse(&file_ast));
        Ok(src)
    }

    fn finish(&self, output_dir: &Path, emitted: &[EmittedArtifact]) -> Result<()> {
        let mut modules: Vec<String> = emitted
            .iter()
            .filter_map(|a| a.path.file_stem())
            .map(|stem| stem.to_string_lossy().into_owned())
            .collect();
        modules.sort();
        modules.dedup();

        let mut mod_rs = String::new();
        mod_rs.push_str("// @generated by vrdr-valueset-gen\n// DO NOT EDIT MANUALLY\n\n");
        for m in &modules {
            mod_rs.push_str(&format!("pub mod {};\n", m));
        }
        mod_rs.push('\n');
        for m in &modules {
            mod_rs.push_str(&format!("pub use {}::*;\n", m));
        }

        fs::create_dir_all(output_dir).map_err(|e| GenError::io(output_dir, e))?;
        let path = output_dir.join("mod.rs");
        fs::write(&path, mod_rs).map_err(|e| GenError::io(&path, e))
    }
}

fn value_set_tokens(type_ident: &syn::Ident, artifact: &ValueSetArtifact<'_>) -> TokenStream {
    let url = artifact.url;

    let docs = doc_attrs(&[
        format!("FHIR ValueSet: {}", artifact.name),
        format!("Canonical URL: {}", artifact.url),
    ]);

    let entries = artifact.codings.iter().map(|c| {
        let system = c.system.as_str();
        let code = c.code.as_str();
        let display = match c.display.as_deref() {
            Some(d) => quote!(Some(#d)),
            None => quote!(None),
        };
        quote!((#system, #code, #display))
    });

    quote! {
        #docs
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct #type_ident;

        impl #type_ident {
            pub const URL: &'static str = #url;

            /// Resolved `(system, code, display)` triples in compose order.
            pub const CODINGS: &'static [(&'static str, &'static str, Option<&'static str>)] = &[
                #(#entries),*
            ];

            pub fn contains(system: &str, code: &str) -> bool {
                Self::CODINGS
                    .iter()
                    .any(|(s, c, _)| *s == system && *c == code)
            }

            pub fn display(system: &str, code: &str) -> Option<&'static str> {
                Self::CODINGS
                    .iter()
                    .find(|(s, c, _)| *s == system && *c == code)
                    .and_then(|(_, _, d)| *d)
            }
        }
    }
}

fn doc_attrs(lines: &[String]) -> TokenStream {
    // Raw '\r' inside a doc string splits the generated line; emit one attribute per line.
    let mut out: Vec<TokenStream> = Vec::new();

    for l in lines {
        let normalized = l.replace("\r\n", "\n").replace('\r', "\n");
        for part in normalized.split('\n') {
            let s = part.trim().to_string();
            out.push(quote!(#[doc = #s]));
        }
    }

    quote!(#(#out)*)
}
