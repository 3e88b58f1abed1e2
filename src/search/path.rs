//! Conversion of drive parent references into site-relative URL paths.
//!
//! The drive API reports a parent folder as `/drive/root:/folder/sub`. When the
//! site is configured with a base directory other than `/`, the portion before
//! that directory is dropped instead of everything before `root:`.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

/// Characters left untouched by `encodeURIComponent`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

const ROOT_TOKEN: &str = "root:";

fn delimiter(base_directory: &str) -> &str {
    if base_directory.is_empty() || base_directory == "/" {
        ROOT_TOKEN
    } else {
        base_directory
    }
}

/// Percent-encode a single path component.
pub fn encode_component(s: &str) -> String {
    utf8_percent_encode(s, COMPONENT).to_string()
}

/// Decode percent escapes for display. Invalid escapes are kept verbatim and
/// invalid UTF-8 is replaced.
pub fn decode_path(s: &str) -> String {
    percent_decode_str(s).decode_utf8_lossy().into_owned()
}

/// Map `/drive/root:/a/b` to `a/b`, normalizing percent-encoding of every
/// segment. Returns `""` when the parent path does not contain the delimiter.
pub fn map_parent_path(parent: &str, base_directory: &str) -> String {
    let Some((_, rest)) = parent.split_once(delimiter(base_directory)) else {
        return String::new();
    };
    rest.split('/')
        .filter(|seg| !seg.is_empty())
        .map(|seg| encode_component(&decode_path(seg)))
        .collect::<Vec<_>>()
        .join("/")
}

/// Site path of an item named `name` inside the mapped folder.
pub fn item_path(mapped_parent: &str, name: &str) -> String {
    let name = encode_component(name);
    if mapped_parent.is_empty() {
        format!("/{name}")
    } else {
        format!("/{mapped_parent}/{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_root_parent_and_escapes_hash() {
        assert_eq!(map_parent_path("/drive/root:/a/b#c", "/"), "a/b%23c");
    }

    #[test]
    fn missing_delimiter_maps_to_empty() {
        assert_eq!(map_parent_path("/drive/items/abc", "/"), "");
        assert_eq!(map_parent_path("", "/"), "");
    }

    #[test]
    fn root_level_parent_maps_to_top_level_item() {
        assert_eq!(map_parent_path("/drive/root:", "/"), "");
        assert_eq!(item_path("", "notes.md"), "/notes.md");
    }

    #[test]
    fn remapping_is_idempotent() {
        let once = map_parent_path("/drive/root:/Music/AC#DC/100% live", "/");
        assert_eq!(once, "Music/AC%23DC/100%25%20live");
        let twice = map_parent_path(&format!("/drive/root:/{once}"), "/");
        assert_eq!(twice, once);
    }

    #[test]
    fn already_encoded_segments_are_not_double_encoded() {
        assert_eq!(
            map_parent_path("/drive/root:/My%20Files/a%23b", "/"),
            "My%20Files/a%23b"
        );
    }

    #[test]
    fn custom_base_directory_is_the_delimiter() {
        assert_eq!(
            map_parent_path("/drive/root:/Public/docs/2024", "/Public"),
            "docs/2024"
        );
        assert_eq!(map_parent_path("/drive/root:/Private/docs", "/Public"), "");
    }

    #[test]
    fn empty_base_directory_behaves_like_root() {
        assert_eq!(map_parent_path("/drive/root:/x", ""), "x");
    }

    #[test]
    fn unicode_segments_round_trip_through_display() {
        let mapped = map_parent_path("/drive/root:/写真/夏", "/");
        assert_eq!(mapped, "%E5%86%99%E7%9C%9F/%E5%A4%8F");
        assert_eq!(decode_path(&mapped), "写真/夏");
    }

    #[test]
    fn item_path_encodes_name() {
        assert_eq!(item_path("a/b%23c", "x y.txt"), "/a/b%23c/x%20y.txt");
        assert_eq!(encode_component("it's (ok)!"), "it's%20(ok)!");
    }
}
