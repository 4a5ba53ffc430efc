//! Template assembly and rendering
//!
//! Two stages: the assembler composes the document's four sections
//! (parameters, variables, resources, outputs) from the cluster definition,
//! then the renderer expands a base template against the assembled document.

mod assemble;
mod generators;
mod renderer;

pub use assemble::{
    AssembledDocument, Assembler, Fragment, SectionFragments, SectionGenerator, SectionSet,
};
pub use renderer::TemplateRenderer;
