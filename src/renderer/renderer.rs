use crate::context::Context;
use crate::engine::Engine;
use crate::errors::Result;
use crate::renderer::processor::Processor;
use crate::template::Template;

/// Given an `Engine` and reference to `Template` and a `Context`, renders text
#[derive(Debug)]
pub struct Renderer<'a> {
    /// Template to render
    template: &'a Template,
    /// Houses filters and the escaping policy
    engine: &'a Engine,
    /// Read-only context to be bound to template
    context: &'a Context,
}

impl<'a> Renderer<'a> {
    /// Create a new `Renderer`
    #[inline]
    pub fn new(template: &'a Template, engine: &'a Engine, context: &'a Context) -> Renderer<'a> {
        Renderer { template, engine, context }
    }

    /// Combines the context with the Template to generate text results
    pub fn render(&self) -> Result<String> {
        let mut processor = Processor::new(&self.template.name, self.engine, self.context);
        processor.render(&self.template.ast)
    }
}
