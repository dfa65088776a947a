use std::borrow::Cow;

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{FrameError, Result};

/// Frame header: "ZBXD" followed by protocol version 1.
pub const HEADER: [u8; HEADER_SIZE] = *b"ZBXD\x01";

/// Size of the header field.
pub const HEADER_SIZE: usize = 5;

/// Size of the little-endian data length field.
pub const LENGTH_SIZE: usize = 8;

/// Header plus length: everything that precedes the data.
pub const PREFIX_SIZE: usize = HEADER_SIZE + LENGTH_SIZE;

/// Data returned by an agent for an item key it does not support.
pub const NOT_SUPPORTED: &[u8] = b"ZBX_NOTSUPPORTED";

/// Default maximum data size accepted from a peer: 1 GiB.
pub const DEFAULT_MAX_DATA_SIZE: u64 = 1024 * 1024 * 1024;

/// A Zabbix protocol frame.
///
/// Frames built with [`Frame::new`] are always valid. Fields are public so
/// that frames obtained any other way can be inspected and checked with
/// [`Frame::is_valid`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// The raw header bytes.
    pub header: [u8; HEADER_SIZE],
    /// The declared data length.
    pub length: u64,
    /// The frame data.
    pub data: Bytes,
}

impl Frame {
    /// Create a frame carrying `data`. The length is derived from the data.
    pub fn new(data: impl Into<Bytes>) -> Self {
        let data = data.into();
        Self {
            header: HEADER,
            length: data.len() as u64,
            data,
        }
    }

    /// An all-zero frame, filled in field by field while parsing.
    pub(crate) fn empty() -> Self {
        Self {
            header: [0; HEADER_SIZE],
            length: 0,
            data: Bytes::new(),
        }
    }

    /// The total wire size of this frame (header + length + data).
    pub fn wire_size(&self) -> usize {
        PREFIX_SIZE + self.data.len()
    }

    /// Append the wire representation of this frame to `dst`.
    ///
    /// The fields are written as they are, so an invalid frame encodes to
    /// invalid bytes.
    pub fn encode(&self, dst: &mut BytesMut) {
        dst.reserve(self.wire_size());
        dst.put_slice(&self.header);
        dst.put_u64_le(self.length);
        dst.put_slice(&self.data);
    }

    /// The wire representation of this frame.
    pub fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.wire_size());
        self.encode(&mut buf);
        buf.freeze()
    }

    /// Returns true if the header is "ZBXD\x01".
    pub fn valid_header(&self) -> bool {
        self.header == HEADER
    }

    /// Returns true if the declared length matches the actual data length.
    pub fn valid_data(&self) -> bool {
        self.length == self.data.len() as u64
    }

    /// Returns true if both the header and the data length are valid.
    pub fn is_valid(&self) -> bool {
        self.valid_header() && self.valid_data()
    }

    /// Returns true unless the data is exactly `ZBX_NOTSUPPORTED`.
    pub fn is_supported(&self) -> bool {
        !self.is_not_supported()
    }

    /// Returns true if the data is exactly `ZBX_NOTSUPPORTED`.
    pub fn is_not_supported(&self) -> bool {
        self.data.as_ref() == NOT_SUPPORTED
    }

    /// The data as text, replacing invalid UTF-8 sequences.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.data)
    }
}

/// Encode `data` into a complete frame.
///
/// Wire format:
/// ```text
/// ┌──────────────────┬──────────────┬─────────────────┐
/// │ Header (5B)      │ Length       │ Data             │
/// │ "ZBXD" 0x01      │ (8B LE)      │ (Length bytes)   │
/// └──────────────────┴──────────────┴─────────────────┘
/// ```
pub fn encode_frame(data: &[u8], dst: &mut BytesMut) {
    dst.reserve(PREFIX_SIZE + data.len());
    dst.put_slice(&HEADER);
    dst.put_u64_le(data.len() as u64);
    dst.put_slice(data);
}

/// Decode a frame from a buffer.
///
/// Returns `Ok(None)` if the buffer doesn't contain a complete frame yet.
/// On success, consumes the frame bytes from the buffer.
pub fn decode_frame(src: &mut BytesMut, max_data_size: u64) -> Result<Option<Frame>> {
    if src.len() < HEADER_SIZE {
        return Ok(None);
    }

    let mut frame = Frame::empty();
    frame.header.copy_from_slice(&src[..HEADER_SIZE]);
    if !frame.valid_header() {
        return Err(FrameError::InvalidHeader { partial: frame });
    }

    if src.len() < PREFIX_SIZE {
        return Ok(None);
    }

    let mut length = [0u8; LENGTH_SIZE];
    length.copy_from_slice(&src[HEADER_SIZE..PREFIX_SIZE]);
    frame.length = u64::from_le_bytes(length);

    let data_len = match usize::try_from(frame.length) {
        Ok(len) if frame.length <= max_data_size => len,
        _ => {
            return Err(FrameError::DataTooLarge {
                declared: frame.length,
                max: max_data_size,
                partial: frame,
            })
        }
    };

    if src.len() - PREFIX_SIZE < data_len {
        return Ok(None);
    }

    src.advance(PREFIX_SIZE);
    frame.data = src.split_to(data_len).freeze();

    Ok(Some(frame))
}

/// Configuration for the frame codec.
#[derive(Debug, Clone)]
pub struct FrameConfig {
    /// Maximum accepted data length in bytes. Default: 1 GiB.
    pub max_data_size: u64,
    /// Read timeout for blocking operations.
    pub read_timeout: Option<std::time::Duration>,
    /// Write timeout for blocking operations.
    pub write_timeout: Option<std::time::Duration>,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            max_data_size: DEFAULT_MAX_DATA_SIZE,
            read_timeout: None,
            write_timeout: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // "ZBXD\x01" + 5u64 LE + "2.2.2"
    const VERSION_FRAME: [u8; 18] = [
        90, 66, 88, 68, 1, 5, 0, 0, 0, 0, 0, 0, 0, 50, 46, 50, 46, 50,
    ];

    #[test]
    fn new_frame_serializes_to_known_bytes() {
        let frame = Frame::new(&b"2.2.2"[..]);

        assert_eq!(frame.to_bytes().as_ref(), &VERSION_FRAME);
        assert_eq!(frame.data.as_ref(), b"2.2.2");
        assert_eq!(frame.length, 5);
        assert!(frame.is_valid());
    }

    #[test]
    fn serialized_layout_is_prefix_then_data() {
        let cases: [&[u8]; 4] = [b"", b"1", b"agent.hostname", &[0, 255, 13, 10]];
        for data in cases {
            let wire = Frame::new(data.to_vec()).to_bytes();

            assert_eq!(&wire[..HEADER_SIZE], &HEADER);
            assert_eq!(&wire[HEADER_SIZE..PREFIX_SIZE], &(data.len() as u64).to_le_bytes());
            assert_eq!(&wire[PREFIX_SIZE..], data);
        }
    }

    #[test]
    fn empty_data_is_valid() {
        let frame = Frame::new(Bytes::new());

        assert_eq!(frame.to_bytes().len(), PREFIX_SIZE);
        assert_eq!(frame.wire_size(), PREFIX_SIZE);
        assert!(frame.is_valid());
    }

    #[test]
    fn encode_frame_matches_frame_encode() {
        let mut a = BytesMut::new();
        let mut b = BytesMut::new();

        encode_frame(b"agent.version", &mut a);
        Frame::new(&b"agent.version"[..]).encode(&mut b);

        assert_eq!(a, b);
    }

    #[test]
    fn corrupt_header_is_invalid() {
        let mut frame = Frame::new(&b"2.2.2"[..]);
        frame.header[0] = b'Y';

        assert!(!frame.valid_header());
        assert!(frame.valid_data());
        assert!(!frame.is_valid());
    }

    #[test]
    fn mismatched_length_is_invalid() {
        let mut frame = Frame::new(&b"2.2.2"[..]);
        frame.length = 6;

        assert!(frame.valid_header());
        assert!(!frame.valid_data());
        assert!(!frame.is_valid());

        frame.length = 5;
        assert!(frame.is_valid());
    }

    #[test]
    fn not_supported_is_exact_match() {
        let frame = Frame::new(NOT_SUPPORTED);
        assert!(frame.is_valid());
        assert!(frame.is_not_supported());
        assert!(!frame.is_supported());

        let near_misses: [&[u8]; 4] = [
            b"ZBX_NOTSUPPORTED\0",
            b"zbx_notsupported",
            b"ZBX_NOTSUPPORTE",
            b"ZBX_NOTSUPPORTED: Unsupported item key.",
        ];
        for data in near_misses {
            let frame = Frame::new(data.to_vec());
            assert!(frame.is_supported(), "{:?}", frame.text());
        }
    }

    #[test]
    fn text_is_lossy() {
        assert_eq!(Frame::new(&b"host01"[..]).text(), "host01");
        assert_eq!(Frame::new(vec![b'a', 0xFF]).text(), "a\u{FFFD}");
    }

    #[test]
    fn decode_known_bytes() {
        let mut buf = BytesMut::from(&VERSION_FRAME[..]);
        let frame = decode_frame(&mut buf, DEFAULT_MAX_DATA_SIZE)
            .unwrap()
            .unwrap();

        assert_eq!(frame, Frame::new(&b"2.2.2"[..]));
        assert!(buf.is_empty());
    }

    #[test]
    fn decode_incomplete_prefix() {
        let mut buf = BytesMut::from(&VERSION_FRAME[..3]);
        assert!(decode_frame(&mut buf, DEFAULT_MAX_DATA_SIZE)
            .unwrap()
            .is_none());

        let mut buf = BytesMut::from(&VERSION_FRAME[..PREFIX_SIZE - 1]);
        assert!(decode_frame(&mut buf, DEFAULT_MAX_DATA_SIZE)
            .unwrap()
            .is_none());
    }

    #[test]
    fn decode_incomplete_data() {
        let mut buf = BytesMut::from(&VERSION_FRAME[..VERSION_FRAME.len() - 1]);
        let result = decode_frame(&mut buf, DEFAULT_MAX_DATA_SIZE).unwrap();

        assert!(result.is_none());
        assert_eq!(buf.len(), VERSION_FRAME.len() - 1);
    }

    #[test]
    fn decode_invalid_header() {
        let mut bytes = VERSION_FRAME;
        bytes[0] = 89;
        let mut buf = BytesMut::from(&bytes[..]);

        let err = decode_frame(&mut buf, DEFAULT_MAX_DATA_SIZE).unwrap_err();
        assert!(matches!(err, FrameError::InvalidHeader { .. }));
        assert_eq!(err.partial().unwrap().header, *b"YBXD\x01");
    }

    #[test]
    fn decode_data_too_large() {
        let mut buf = BytesMut::new();
        buf.put_slice(&HEADER);
        buf.put_u64_le(64);

        let err = decode_frame(&mut buf, 16).unwrap_err();
        assert!(matches!(
            err,
            FrameError::DataTooLarge {
                declared: 64,
                max: 16,
                ..
            }
        ));
    }

    #[test]
    fn decode_multiple_frames() {
        let mut buf = BytesMut::new();
        encode_frame(b"first", &mut buf);
        encode_frame(b"second", &mut buf);

        let f1 = decode_frame(&mut buf, DEFAULT_MAX_DATA_SIZE)
            .unwrap()
            .unwrap();
        let f2 = decode_frame(&mut buf, DEFAULT_MAX_DATA_SIZE)
            .unwrap()
            .unwrap();

        assert_eq!(f1.data.as_ref(), b"first");
        assert_eq!(f2.data.as_ref(), b"second");
        assert!(buf.is_empty());
    }
}
