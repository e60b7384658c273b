/// Grant-type identification from the filled-in selector fields.
pub mod grant_classifier;
/// The closed set of grant shapes and the fields each one requires.
pub mod grant_type;
/// Declared grant parameters for both engines.
pub mod params;
