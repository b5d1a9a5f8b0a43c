//! ZMDB binary reader
//!
//! Parses a Zune device's media catalog into the typed [`crate::model`]
//! tree. The entry point is [`parse`]; everything else in this module
//! tree exists to support it and is not part of the public surface.

mod bytes;
mod descriptor;
mod error;
mod family;
mod header;
mod parser;
mod record;
mod schema;
mod strings;
mod varint;

pub use family::DeviceFamily;

use log::{error, warn};

/// Parse a ZMDB buffer for the given device family into a [`crate::model::Library`].
///
/// This never fails: a truncated or malformed input degrades to an empty
/// or partial library rather than returning an error, since a reader has
/// no useful recovery action beyond "show what could be recovered"
/// (spec §7).
pub fn parse(buf: &[u8], family: DeviceFamily) -> crate::model::Library {
    let header = match header::read_header(buf) {
        Ok(header) => header,
        Err(err) => {
            error!("failed to read ZMDB header: {err}");
            return crate::model::Library::new();
        }
    };

    let expected_version = match family {
        DeviceFamily::Classic => header::VERSION_CLASSIC,
        DeviceFamily::Hd => header::VERSION_HD,
    };
    if header.version != expected_version {
        warn!(
            "header version {} does not match requested family (expected {})",
            header.version, expected_version
        );
    }

    let descriptors = match descriptor::read_descriptor_table(buf, header.descriptor_table_offset)
    {
        Ok(descriptors) => descriptors,
        Err(err) => {
            error!("failed to read descriptor table: {err}");
            return crate::model::Library::new();
        }
    };

    parser::extract(buf, family.layout(), &descriptors)
}

/// Detect a device family directly from the header's version field,
/// without requiring the caller to already know it.
pub fn detect_family(buf: &[u8]) -> Option<DeviceFamily> {
    let header = header::read_header(buf).ok()?;
    DeviceFamily::from_version(header.version)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncated_buffer_yields_empty_library() {
        let buf = [0u8; 8];
        let library = parse(&buf, DeviceFamily::Hd);
        assert_eq!(library.track_count(), 0);
    }
}
