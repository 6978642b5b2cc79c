//! Core State trait for flow states.
//!
//! Every flow declares its steps as a `State` type. The state's `name` is the
//! string identity used for breadcrumb trails, navigation keys and logging.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::hash::Hash;

/// Trait for flow states.
///
/// All methods are pure. States are plain values naming the step a flow is
/// currently on; they never carry render logic.
///
/// # Required Traits
///
/// - `Clone`: states are copied into history records
/// - `Eq` + `Hash`: states key the machine definition
/// - `Debug`: states are debuggable for diagnostics
/// - `Serialize` + `Deserialize`: transition history is serializable
///
/// # Example
///
/// ```rust
/// use flowkit::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
/// enum LocationStep {
///     Index,
///     Add,
///     Edit,
/// }
///
/// impl State for LocationStep {
///     fn name(&self) -> &str {
///         match self {
///             Self::Index => "index",
///             Self::Add => "add",
///             Self::Edit => "edit",
///         }
///     }
/// }
///
/// assert_eq!(LocationStep::Edit.name(), "edit");
/// ```
pub trait State:
    Clone + Eq + Hash + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync
{
    /// The state's name, used as breadcrumb id and navigation key.
    fn name(&self) -> &str;

    /// Check if this is a final state.
    ///
    /// A nested flow sitting in a final state is complete and hands routing
    /// back to its parent. Top-level flows are not affected.
    ///
    /// Default implementation returns `false`.
    fn is_final(&self) -> bool {
        false
    }
}
