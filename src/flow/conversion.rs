use super::definition::FlowDefinition;
use crate::error::ConversionError;

/// A trait for custom data models that can be converted into a `FlowDefinition`.
///
/// This is the extension point that keeps the engine format-agnostic. The editor
/// document format is supported out of the box through [`crate::ui::UiWorkflow`];
/// other formats implement this trait on their own structs.
///
/// # Example
///
/// ```rust,no_run
/// use nagare::prelude::*;
///
/// struct Step { name: String, expression: String }
/// struct Pipeline { steps: Vec<Step> }
///
/// impl IntoFlow for Pipeline {
///     fn into_flow(self) -> std::result::Result<FlowDefinition, ConversionError> {
///         let mut nodes = Vec::new();
///         let mut edges = Vec::new();
///         for (i, step) in self.steps.iter().enumerate() {
///             nodes.push(FlowNode::new(
///                 step.name.clone(),
///                 NodeKind::Transform(TransformConfig::new(step.expression.clone())),
///             ));
///             if i > 0 {
///                 let previous = &self.steps[i - 1].name;
///                 edges.push(FlowEdge::new(format!("e{}", i), previous.clone(), step.name.clone()));
///             }
///         }
///         Ok(FlowDefinition::new(nodes, edges))
///     }
/// }
/// ```
pub trait IntoFlow {
    /// Consumes the object and converts it into a workflow definition.
    fn into_flow(self) -> Result<FlowDefinition, ConversionError>;
}

impl IntoFlow for FlowDefinition {
    fn into_flow(self) -> Result<FlowDefinition, ConversionError> {
        Ok(self)
    }
}
