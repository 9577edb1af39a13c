//! Macros for ergonomic machine construction.

/// Declare a field-less enum usable as a [`StateKey`](crate::core::StateKey).
///
/// The generated enum derives everything the trait requires, and `name()`
/// returns the variant identifier.
///
/// # Example
///
/// ```
/// use hsm_engine::core::StateKey;
/// use hsm_engine::state_keys;
///
/// state_keys! {
///     pub enum Heater {
///         Root,
///         Heating,
///         Idle,
///     }
/// }
///
/// assert_eq!(Heater::Heating.name(), "Heating");
/// ```
#[macro_export]
macro_rules! state_keys {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize,
        )]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::StateKey for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }
        }
    };
}
