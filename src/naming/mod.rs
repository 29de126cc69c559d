pub mod mounting;
pub mod normalize;

/// Mounting suffixes used by the edge naming convention, without their leading separator.
///
/// Ordered so that a token always comes before any shorter token it contains, e.g. `sigplus`
/// before `sig`. Stripping in any other order leaves fragments such as `plus` behind.
pub const SUFFIX_TOKENS: [&str; 5] = ["sigplus", "vert", "lum", "sig", "either"];
