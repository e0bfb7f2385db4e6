//! WAV file header parsing for `CF32` capture files (§4.2).
//!
//! Validates the fixed 44-byte RIFF/WAVE header against the fields
//! this pipeline requires (`IEEE float`, stereo) and reports the
//! sample rate so the rest of the graph can be sized accordingly.
//! Grounded on `WAVFile::openFile`'s `WAVFileFormat` struct in
//! `Device.cpp`.

use crate::error::{Error, Result};
use std::io::Read;

const GROUP_ID_RIFF: u32 = 0x4646_4952; // "RIFF" little-endian
const RIFF_TYPE_WAVE: u32 = 0x4556_4157; // "WAVE"
const DATA_ID: u32 = 0x6174_6164; // "data"
const FORMAT_TAG_IEEE_FLOAT: u16 = 3;
const EXPECTED_CHANNELS: u16 = 2;

/// The fixed 44-byte header this pipeline accepts: stereo, 32-bit
/// IEEE-float samples (i.e. already `CF32`-shaped I/Q pairs).
#[derive(Clone, Copy, Debug)]
pub struct WavHeader {
    pub sample_rate_hz: u32,
    pub bits_per_sample: u16,
}

fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes(bytes[offset..offset + 4].try_into().unwrap())
}

fn read_u16(bytes: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes(bytes[offset..offset + 2].try_into().unwrap())
}

/// Parse and validate a 44-byte WAV header already read into memory.
pub fn parse_header(header: &[u8; 44]) -> Result<WavHeader> {
    let group_id = read_u32(header, 0);
    let riff_type = read_u32(header, 8);
    let format_tag = read_u16(header, 20);
    let channels = read_u16(header, 22);
    let sample_rate_hz = read_u32(header, 24);
    let bits_per_sample = read_u16(header, 34);
    let data_id = read_u32(header, 36);

    if group_id != GROUP_ID_RIFF
        || riff_type != RIFF_TYPE_WAVE
        || data_id != DATA_ID
        || format_tag != FORMAT_TAG_IEEE_FLOAT
        || channels != EXPECTED_CHANNELS
    {
        return Err(Error::UnsupportedFormat(
            "expected a stereo IEEE-float (CF32) RIFF/WAVE file".into(),
        ));
    }

    Ok(WavHeader {
        sample_rate_hz,
        bits_per_sample,
    })
}

/// Read and validate the 44-byte header from an open reader, leaving
/// the cursor positioned at the start of sample data.
pub fn read_header<R: Read>(reader: &mut R) -> Result<WavHeader> {
    let mut raw = [0u8; 44];
    reader.read_exact(&mut raw)?;
    parse_header(&raw)
}
