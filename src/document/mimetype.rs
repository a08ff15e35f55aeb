//! ODF mimetypes and their canonical file extensions.

/// Every ODF mimetype starts with this prefix.
pub const ODF_PREFIX: &str = "application/vnd.oasis.opendocument.";

/// Extension to mimetype subtype (the part after [`ODF_PREFIX`]).
pub const ODF_FORMATS: [(&str, &str); 12] = [
    ("odt", "text"),
    ("ods", "spreadsheet"),
    ("odp", "presentation"),
    ("odg", "graphics"),
    ("odc", "chart"),
    ("odf", "formula"),
    ("odi", "image"),
    ("odm", "text-master"),
    ("ott", "text-template"),
    ("ots", "spreadsheet-template"),
    ("otp", "presentation-template"),
    ("otg", "graphics-template"),
];

/// Returns the ODF extension for a mimetype, or `""` if it is not an ODF type.
pub fn extension_for_mimetype(mimetype: &str) -> &'static str {
    let Some(subtype) = mimetype.trim().strip_prefix(ODF_PREFIX) else {
        return "";
    };
    ODF_FORMATS
        .iter()
        .find(|(_, s)| *s == subtype)
        .map_or("", |(ext, _)| *ext)
}

/// Returns the full mimetype for an ODF extension (case-insensitive).
pub fn mimetype_for_extension(extension: &str) -> Option<String> {
    let extension = extension.trim_start_matches('.').to_ascii_lowercase();
    ODF_FORMATS
        .iter()
        .find(|(ext, _)| *ext == extension)
        .map(|(_, subtype)| format!("{ODF_PREFIX}{subtype}"))
}
