//! Hook and handler identifier transforms.
//!
//! Each renderer derives identifiers from a command's path with one of the
//! pure transforms below. The transforms depend only on the path segments,
//! never on siblings or tree shape, so generated call sites and user hook
//! files stay in agreement across rebuilds.

/// Join a command path into a snake_case identifier: `prefix_seg1_seg2`.
///
/// Segments are lowercased and any character that is not `[a-z0-9]` becomes
/// an underscore, so `dry-run` and `dry_run` collapse to the same name.
pub fn snake_ident(prefix: &str, path: &[String]) -> String {
    let mut out = String::from(prefix);
    for segment in path {
        out.push('_');
        for c in segment.chars() {
            let c = c.to_ascii_lowercase();
            if c.is_ascii_alphanumeric() {
                out.push(c);
            } else {
                out.push('_');
            }
        }
    }
    out
}

/// Join a command path into a camelCase identifier: `prefixSeg1Seg2`.
///
/// Within a segment, `-` and `_` act as word breaks: `dry-run` → `DryRun`.
pub fn camel_ident(prefix: &str, path: &[String]) -> String {
    let mut out = String::from(prefix);
    for segment in path {
        let mut upper_next = true;
        for c in segment.chars() {
            if c.is_ascii_alphanumeric() {
                if upper_next {
                    out.push(c.to_ascii_uppercase());
                    upper_next = false;
                } else {
                    out.push(c.to_ascii_lowercase());
                }
            } else {
                upper_next = true;
            }
        }
    }
    out
}
