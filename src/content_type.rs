//! Content-Type selection for outgoing requests.
//!
//! Most endpoints take JSON. Attachment endpoints take `multipart/mixed`.
//! The choice is made from the resource path alone using [`CONTENT_TYPE_RULES`]:
//! the first rule whose segment appears in the path wins, otherwise
//! [`DEFAULT_CONTENT_TYPE`] applies.

/// Content-Type used when no rule matches.
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";

/// Path segment → Content-Type rules, checked in order.
pub const CONTENT_TYPE_RULES: &[(&str, &str)] = &[("attachments", "multipart/mixed")];

/// Returns the Content-Type for a resource path.
///
/// A rule matches when its segment equals one of the `/`-separated segments
/// of `resource_path`.
///
/// # Examples
///
/// ```
/// use moneybird::content_type::content_type_for;
///
/// assert_eq!(content_type_for("sales_invoices/12/attachments"), "multipart/mixed");
/// assert_eq!(content_type_for("contacts"), "application/json");
/// ```
pub fn content_type_for(resource_path: &str) -> &'static str {
    CONTENT_TYPE_RULES
        .iter()
        .find(|(segment, _)| resource_path.split('/').any(|part| part == *segment))
        .map(|(_, content_type)| *content_type)
        .unwrap_or(DEFAULT_CONTENT_TYPE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attachment_paths_are_multipart() {
        assert_eq!(content_type_for("attachments"), "multipart/mixed");
        assert_eq!(content_type_for("sales_invoices/1/attachments"), "multipart/mixed");
        assert_eq!(
            content_type_for("documents/purchase_invoices/9/attachments/"),
            "multipart/mixed"
        );
    }

    #[test]
    fn test_other_paths_are_json() {
        for path in ["", "contacts", "contacts/1", "ledger_accounts", "products/5"] {
            assert_eq!(content_type_for(path), "application/json", "path {:?}", path);
        }
    }

    #[test]
    fn test_partial_segment_does_not_match() {
        assert_eq!(content_type_for("attachments_archive"), "application/json");
    }
}
