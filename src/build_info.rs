//! Commit and date baked in by build.rs.

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_info_present() {
        assert!(!BUILD_COMMIT.is_empty());
        assert!(BUILD_DATE == "unknown" || BUILD_DATE.len() == 10);
    }
}
