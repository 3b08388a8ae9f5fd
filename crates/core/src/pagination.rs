//! Limit/offset clamping shared by list endpoints.

/// Default page size for list endpoints.
pub const DEFAULT_LIST_LIMIT: i64 = 50;

/// Hard upper bound for a single page.
pub const MAX_LIST_LIMIT: i64 = 200;

/// Clamp a user-provided limit to `[1, max]`, falling back to `default`.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_defaults_and_bounds() {
        assert_eq!(clamp_limit(None, 20, 100), 20);
        assert_eq!(clamp_limit(Some(0), 20, 100), 1);
        assert_eq!(clamp_limit(Some(500), 20, 100), 100);
    }

    #[test]
    fn negative_offset_becomes_zero() {
        assert_eq!(clamp_offset(Some(-5)), 0);
        assert_eq!(clamp_offset(None), 0);
        assert_eq!(clamp_offset(Some(30)), 30);
    }
}
