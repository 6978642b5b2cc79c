//! Macros for declaring flow states.

/// Declare a state enum and its `State` implementation.
///
/// Each variant names the string state name used by breadcrumbs and
/// navigation. Variants listed under `final:` complete a nested flow.
///
/// # Example
///
/// ```
/// use flowkit::state_enum;
/// use flowkit::core::State;
///
/// state_enum! {
///     pub enum LocationStep {
///         Index => "index",
///         Add => "add",
///         Edit => "edit",
///     }
/// }
///
/// assert_eq!(LocationStep::Add.name(), "add");
/// ```
#[macro_export]
macro_rules! state_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident => $label:literal
            ),* $(,)?
        }

        $(final: [$($final:ident),* $(,)?])?
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::State for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => $label),*
                }
            }

            fn is_final(&self) -> bool {
                match self {
                    $($(Self::$final => true,)*)?
                    #[allow(unreachable_patterns)]
                    _ => false,
                }
            }
        }
    };
}
