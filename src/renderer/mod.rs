//! Responsible for rendering templates

pub use self::pipeline::RawValue;
pub use self::renderer::Renderer;

mod call_stack;
mod pipeline;
mod processor;
mod renderer;
mod stack_frame;

#[cfg(test)]
mod tests;
