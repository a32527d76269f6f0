//! Bone name normalization for Mixamo-style rigs
//!
//! Mixamo rigs name their bones `mixamorig:Hips`, `mixamorig:Spine`, ...
//! The colon is stripped before names are sent to the generation service and
//! put back when payload tracks are matched against the hierarchy.

/// Prefix used by Mixamo rigs, without its separator
pub const MIXAMO_PREFIX: &str = "mixamorig";

/// Separator that follows [`MIXAMO_PREFIX`] in host bone names
pub const MIXAMO_SEPARATOR: char = ':';

/// Strip the separator after the Mixamo prefix: `mixamorig:Hips` -> `mixamorigHips`
pub fn normalize_bone_name(name: &str) -> String {
    match name.strip_prefix(MIXAMO_PREFIX) {
        Some(rest) => match rest.strip_prefix(MIXAMO_SEPARATOR) {
            Some(bare) => format!("{MIXAMO_PREFIX}{bare}"),
            None => name.to_string(),
        },
        None => name.to_string(),
    }
}

/// Reinsert the separator after the Mixamo prefix: `mixamorigHips` -> `mixamorig:Hips`
///
/// Names that already carry the separator are returned unchanged.
pub fn denormalize_bone_name(name: &str) -> String {
    match name.strip_prefix(MIXAMO_PREFIX) {
        Some(rest) if !rest.starts_with(MIXAMO_SEPARATOR) => {
            format!("{MIXAMO_PREFIX}{MIXAMO_SEPARATOR}{rest}")
        }
        _ => name.to_string(),
    }
}
