//! Forward-only PCM stream over a BGW/SPW file
//!
//! PCM payloads are passed through unchanged. ADPCM payloads are decoded
//! ahead in groups of blocks into an internal buffer. Either kind can be
//! prefixed with a synthetic 44-byte WAV header.
//!
//! The stream has no seek, write or resize; code that tries is rejected
//! at compile time:
//!
//! ```compile_fail
//! use std::io::{Cursor, Seek, SeekFrom};
//! use pol_audio::sound::AudioStream;
//!
//! fn rewind(stream: &mut AudioStream<Cursor<Vec<u8>>>) {
//!     stream.seek(SeekFrom::Start(0)).unwrap();
//! }
//! ```

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use tracing::{debug, trace, warn};

use super::adpcm::{AdpcmCodec, DecoderState};
use super::decoder::{DecodeError, DecodeResult, PcmSource};
use super::formats::{SampleFormat, LEADER_SIZE, WAV_HEADER_SIZE};
use super::header::AudioHeader;
use super::wav::WavHeader;

/// Number of ADPCM blocks decoded per buffer refill.
pub const DEFAULT_BUFFER_BLOCKS: usize = 32;

/// Stream construction options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamOptions {
    /// Prefix the PCM data with a synthetic WAV header
    pub wav_header: bool,
    /// ADPCM blocks decoded per refill (at least 1)
    pub buffer_blocks: usize,
}

impl StreamOptions {
    pub fn with_wav_header(mut self, wav_header: bool) -> Self {
        self.wav_header = wav_header;
        self
    }

    pub fn with_buffer_blocks(mut self, buffer_blocks: usize) -> Self {
        self.buffer_blocks = buffer_blocks;
        self
    }
}

impl Default for StreamOptions {
    fn default() -> Self {
        Self {
            wav_header: false,
            buffer_blocks: DEFAULT_BUFFER_BLOCKS,
        }
    }
}

/// Read position and decode lookahead
#[derive(Debug, Default)]
struct StreamCursor {
    /// Synthetic header bytes served plus payload bytes consumed from the file
    raw_pos: u64,
    /// Decoded PCM lookahead, allocated on first refill
    buf: Vec<u8>,
    /// Read offset within `buf`
    buf_ofs: usize,
    /// Number of valid bytes in `buf`
    buf_len: usize,
    /// The file ran out of whole blocks
    end_of_data: bool,
    /// Failure hit after part of a group decoded; raised once `buf` drains
    deferred_error: Option<DecodeError>,
}

impl StreamCursor {
    fn buffered(&self) -> &[u8] {
        &self.buf[self.buf_ofs..self.buf_len]
    }
}

/// ADPCM codec plus the per-stream state it advances
#[derive(Debug)]
struct AdpcmPipeline {
    codec: AdpcmCodec,
    state: DecoderState,
    /// Scratch space for one compressed block
    block: Vec<u8>,
}

/// PCM stream over the payload of a BGW/SPW file
///
/// The stream owns its reader. `close` releases it early; otherwise it is
/// released when the stream is dropped.
pub struct AudioStream<R: Read> {
    reader: Option<R>,
    header: AudioHeader,
    adpcm: Option<AdpcmPipeline>,
    wav_header: Option<[u8; WAV_HEADER_SIZE]>,
    buffer_blocks: usize,
    cursor: StreamCursor,
    /// Error to report on the next read, after the bytes before it were returned
    pending_error: Option<DecodeError>,
    /// A read failed; the stream yields no more data
    failed: bool,
}

impl AudioStream<BufReader<File>> {
    /// Open `path` and position the stream at the start of the payload
    pub fn open(
        path: impl AsRef<Path>,
        header: AudioHeader,
        options: StreamOptions,
    ) -> DecodeResult<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        debug!(path = %path.display(), "opened audio stream");
        Self::from_reader(BufReader::new(file), header, options)
    }
}

impl<R: Read> AudioStream<R> {
    /// Wrap a reader positioned at the start of the file.
    ///
    /// The fixed leader is consumed here, regardless of how many bytes the
    /// header parser read. Headers that fail `AudioHeader::validate` are
    /// rejected.
    pub fn from_reader(
        mut reader: R,
        header: AudioHeader,
        options: StreamOptions,
    ) -> DecodeResult<Self> {
        if !header.sample_format.is_supported() {
            return Err(DecodeError::UnsupportedSampleFormat(header.sample_format));
        }
        header.validate()?;

        let adpcm = match header.sample_format {
            SampleFormat::Adpcm => {
                let codec = AdpcmCodec::new(header.channels, header.block_size)?;
                Some(AdpcmPipeline {
                    codec,
                    state: codec.new_state(),
                    block: vec![0u8; codec.input_len()],
                })
            }
            _ => None,
        };

        let skipped = io::copy(&mut (&mut reader).take(LEADER_SIZE), &mut io::sink())?;
        if skipped < LEADER_SIZE {
            debug!(skipped, "file ends inside the leader");
        }

        let mut stream = Self {
            reader: Some(reader),
            header,
            adpcm,
            wav_header: None,
            buffer_blocks: options.buffer_blocks.max(1),
            cursor: StreamCursor::default(),
            pending_error: None,
            failed: false,
        };

        if options.wav_header {
            let image = WavHeader {
                channels: u16::from(stream.header.channels),
                sample_rate: stream.header.sample_rate().max(0) as u32,
                total_length: stream.payload_length() + WAV_HEADER_SIZE as u64,
            }
            .to_bytes();
            stream.wav_header = Some(image);
        }

        Ok(stream)
    }

    pub fn header(&self) -> &AudioHeader {
        &self.header
    }

    pub fn has_wav_header(&self) -> bool {
        self.wav_header.is_some()
    }

    pub fn is_closed(&self) -> bool {
        self.reader.is_none()
    }

    fn header_len(&self) -> u64 {
        if self.wav_header.is_some() {
            WAV_HEADER_SIZE as u64
        } else {
            0
        }
    }

    /// Decoded byte count, synthetic header excluded
    fn payload_length(&self) -> u64 {
        let h = &self.header;
        let bytes = match h.sample_format {
            SampleFormat::Adpcm => {
                i64::from(h.sample_blocks)
                    * i64::from(h.block_size)
                    * i64::from(h.channels)
                    * 2
            }
            _ => i64::from(h.size) - LEADER_SIZE as i64,
        };
        bytes.max(0) as u64
    }

    /// Total logical length in bytes, synthetic header included
    pub fn length(&self) -> u64 {
        self.payload_length() + self.header_len()
    }

    /// Logical position in bytes.
    ///
    /// For ADPCM this projects the compressed file offset onto the decoded
    /// stream, so it is only accurate to a block and runs ahead of the
    /// bytes returned by up to one buffered group.
    pub fn position(&self) -> u64 {
        let header_len = self.header_len();
        let pos = self.cursor.raw_pos;
        if header_len > 0 && pos <= header_len {
            return pos;
        }

        let raw = pos - header_len;
        let cooked = match &self.adpcm {
            Some(pipeline) => {
                let block_size = pipeline.codec.block_size();
                let blocks = raw as f64 / (1 + block_size / 2) as f64;
                (blocks * (block_size * 2) as f64).floor() as u64
            }
            None => raw,
        };
        cooked + header_len
    }

    /// Read up to `buf.len()` bytes of PCM (after the synthetic header, if
    /// any). Returns `Ok(0)` at end of stream.
    ///
    /// An I/O or decode error aborts the stream. Bytes produced before the
    /// error in the same call are returned first and the error is reported
    /// by the next call; every call after that fails with
    /// `DecodeError::Aborted`.
    pub fn read(&mut self, buf: &mut [u8]) -> DecodeResult<usize> {
        if self.reader.is_none() {
            return Err(DecodeError::Closed);
        }
        if let Some(err) = self.pending_error.take() {
            return Err(err);
        }
        if self.failed {
            return Err(DecodeError::Aborted);
        }

        let mut written = 0;
        if let Some(image) = &self.wav_header {
            let pos = self.cursor.raw_pos as usize;
            if pos < WAV_HEADER_SIZE {
                let count = (WAV_HEADER_SIZE - pos).min(buf.len());
                buf[..count].copy_from_slice(&image[pos..pos + count]);
                self.cursor.raw_pos += count as u64;
                written = count;
            }
        }

        if written < buf.len() {
            let rest = &mut buf[written..];
            let mut filled = 0;
            let result = if self.adpcm.is_some() {
                self.read_decoded(rest, &mut filled)
            } else {
                self.read_passthrough(rest, &mut filled)
            };
            written += filled;

            if let Err(err) = result {
                warn!(id = self.header.id, error = %err, "audio stream aborted");
                self.failed = true;
                if written == 0 {
                    return Err(err);
                }
                self.pending_error = Some(err);
            }
        }

        Ok(written)
    }

    /// Release the reader. Later reads fail with `DecodeError::Closed`.
    pub fn close(&mut self) {
        if self.reader.take().is_some() {
            debug!(id = self.header.id, "closed audio stream");
        }
    }

    /// Copy file bytes into `out`, counting progress in `filled` even on error
    fn read_passthrough(&mut self, out: &mut [u8], filled: &mut usize) -> DecodeResult<()> {
        let reader = self.reader.as_mut().ok_or(DecodeError::Closed)?;
        let result = read_full(reader, out, filled);
        self.cursor.raw_pos += *filled as u64;
        Ok(result?)
    }

    /// Serve decoded bytes into `out`, counting progress in `filled` even on error
    fn read_decoded(&mut self, out: &mut [u8], filled: &mut usize) -> DecodeResult<()> {
        while *filled < out.len() {
            let available = self.cursor.buffered();
            if available.is_empty() {
                if let Some(err) = self.cursor.deferred_error.take() {
                    return Err(err);
                }
                if self.cursor.end_of_data {
                    break;
                }
                self.refill()?;
                continue;
            }

            let count = available.len().min(out.len() - *filled);
            out[*filled..*filled + count].copy_from_slice(&available[..count]);
            self.cursor.buf_ofs += count;
            *filled += count;
        }
        Ok(())
    }

    /// Decode the next group of blocks into the lookahead buffer
    fn refill(&mut self) -> DecodeResult<()> {
        let reader = self.reader.as_mut().ok_or(DecodeError::Closed)?;
        let Some(pipeline) = self.adpcm.as_mut() else {
            return Ok(());
        };
        let cursor = &mut self.cursor;
        let out_len = pipeline.codec.output_len();

        if cursor.buf.is_empty() {
            cursor.buf = vec![0u8; out_len * self.buffer_blocks];
        }
        cursor.buf_ofs = 0;
        cursor.buf_len = 0;

        let mut blocks = 0;
        while blocks < self.buffer_blocks {
            let mut count = 0;
            let mut result =
                read_full(reader, &mut pipeline.block, &mut count).map_err(DecodeError::from);
            cursor.raw_pos += count as u64;

            if result.is_ok() && count < pipeline.block.len() {
                if count > 0 {
                    warn!(
                        bytes = count,
                        block = pipeline.block.len(),
                        "dropping truncated ADPCM block"
                    );
                }
                cursor.end_of_data = true;
                break;
            }

            let end = cursor.buf_len + out_len;
            if result.is_ok() {
                result = pipeline.codec.decode_block(
                    &mut pipeline.state,
                    &pipeline.block,
                    &mut cursor.buf[cursor.buf_len..end],
                );
            }
            if let Err(err) = result {
                if cursor.buf_len == 0 {
                    return Err(err);
                }
                // Serve the blocks decoded so far before failing.
                cursor.deferred_error = Some(err);
                cursor.end_of_data = true;
                break;
            }
            cursor.buf_len = end;
            blocks += 1;
        }

        trace!(blocks, bytes = cursor.buf_len, "refilled ADPCM buffer");
        Ok(())
    }
}

/// Read until `buf` is full or the reader is exhausted.
///
/// `filled` holds the bytes read so far, including when an error is returned.
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8], filled: &mut usize) -> io::Result<()> {
    while *filled < buf.len() {
        match reader.read(&mut buf[*filled..]) {
            Ok(0) => break,
            Ok(n) => *filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

impl<R: Read> PcmSource for AudioStream<R> {
    fn read(&mut self, buf: &mut [u8]) -> DecodeResult<usize> {
        AudioStream::read(self, buf)
    }

    fn length(&self) -> u64 {
        AudioStream::length(self)
    }

    fn position(&self) -> u64 {
        AudioStream::position(self)
    }

    fn close(&mut self) {
        AudioStream::close(self)
    }
}

impl<R: Read> Read for AudioStream<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        AudioStream::read(self, buf).map_err(io::Error::from)
    }
}

impl<R: Read> std::fmt::Debug for AudioStream<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioStream")
            .field("header", &self.header)
            .field("wav_header", &self.wav_header.is_some())
            .field("buffer_blocks", &self.buffer_blocks)
            .field("raw_pos", &self.cursor.raw_pos)
            .field("closed", &self.reader.is_none())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sound::formats::ContainerVariant;
    use std::io::Cursor;

    fn pcm_header(payload: usize) -> AudioHeader {
        AudioHeader {
            size: (LEADER_SIZE as usize + payload) as i32,
            sample_format: SampleFormat::Pcm,
            sample_blocks: (payload / 4) as i32,
            loop_start: -1,
            sample_rate_high: 22050,
            channels: 2,
            ..AudioHeader::default()
        }
    }

    fn adpcm_header(channels: u8, block_size: u8, blocks: usize) -> AudioHeader {
        let block_len = (1 + usize::from(block_size) / 2) * usize::from(channels);
        AudioHeader {
            size: (LEADER_SIZE as usize + block_len * blocks) as i32,
            sample_format: SampleFormat::Adpcm,
            sample_blocks: blocks as i32,
            loop_start: -1,
            sample_rate_high: 44100,
            channels,
            block_size,
            ..AudioHeader::default()
        }
    }

    fn file_bytes(header: &AudioHeader, payload: &[u8]) -> Vec<u8> {
        let mut bytes = header.to_bytes(ContainerVariant::BgmStream).unwrap();
        bytes.extend_from_slice(payload);
        bytes
    }

    /// Mono blocks of 2 samples whose residuals are both `value`
    fn constant_blocks(blocks: usize, value: u8) -> Vec<u8> {
        (0..blocks).flat_map(|_| [0x0C, value | (value << 4)]).collect()
    }

    fn stream(header: AudioHeader, payload: &[u8], options: StreamOptions) -> AudioStream<Cursor<Vec<u8>>> {
        let bytes = file_bytes(&header, payload);
        AudioStream::from_reader(Cursor::new(bytes), header, options).unwrap()
    }

    fn read_all<R: Read>(stream: &mut AudioStream<R>, chunk: usize) -> Vec<u8> {
        let mut out = Vec::new();
        let mut buf = vec![0u8; chunk];
        loop {
            let n = stream.read(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            out.extend_from_slice(&buf[..n]);
        }
        out
    }

    #[test]
    fn test_pcm_passthrough() {
        let payload: Vec<u8> = (0..=255u8).collect();
        let mut s = stream(pcm_header(payload.len()), &payload, StreamOptions::default());
        assert_eq!(s.length(), 256);
        assert_eq!(read_all(&mut s, 100), payload);
        assert_eq!(s.position(), 256);
    }

    #[test]
    fn test_pcm_with_wav_header() {
        let payload = vec![0xABu8; 16];
        let options = StreamOptions::default().with_wav_header(true);
        let mut s = stream(pcm_header(payload.len()), &payload, options);
        assert_eq!(s.length(), 44 + 16);

        let out = read_all(&mut s, 7);
        assert_eq!(&out[..4], b"RIFF");
        assert_eq!(&out[44..], &payload[..]);
    }

    #[test]
    fn test_header_split_across_reads() {
        let payload: Vec<u8> = (0..32u8).collect();
        let options = StreamOptions::default().with_wav_header(true);
        let header = pcm_header(payload.len());
        let image = WavHeader {
            channels: 2,
            sample_rate: 22050,
            total_length: 44 + 32,
        }
        .to_bytes();
        let mut s = stream(header, &payload, options);

        let mut first = [0u8; 30];
        assert_eq!(s.read(&mut first).unwrap(), 30);
        assert_eq!(s.position(), 30);
        let mut second = [0u8; 30];
        assert_eq!(s.read(&mut second).unwrap(), 30);

        let mut expected = image.to_vec();
        expected.extend_from_slice(&payload);
        let mut actual = first.to_vec();
        actual.extend_from_slice(&second);
        assert_eq!(actual, expected[..60]);
    }

    #[test]
    fn test_adpcm_decodes_all_blocks() {
        let header = adpcm_header(1, 2, 5);
        let payload = constant_blocks(5, 3);
        let mut s = stream(header, &payload, StreamOptions::default().with_buffer_blocks(2));
        assert_eq!(s.length(), 5 * 2 * 2);

        let out = read_all(&mut s, 3);
        assert_eq!(out.len(), 20);
        for pair in out.chunks_exact(2) {
            assert_eq!(i16::from_le_bytes([pair[0], pair[1]]), 3);
        }
    }

    #[test]
    fn test_large_read_spans_refills() {
        let header = adpcm_header(1, 2, 10);
        let payload = constant_blocks(10, 1);
        let mut s = stream(header, &payload, StreamOptions::default().with_buffer_blocks(3));

        let mut buf = [0u8; 30];
        assert_eq!(s.read(&mut buf).unwrap(), 30);
        let mut rest = [0u8; 30];
        assert_eq!(s.read(&mut rest).unwrap(), 10);
        assert_eq!(s.read(&mut rest).unwrap(), 0);
    }

    #[test]
    fn test_truncated_trailing_block_is_dropped() {
        let header = adpcm_header(1, 4, 3);
        let mut payload = vec![0x0C, 0x11, 0x11, 0x0C, 0x22, 0x22];
        payload.extend_from_slice(&[0x0C, 0x33]);
        let mut s = stream(header, &payload, StreamOptions::default());
        let out = read_all(&mut s, 64);
        assert_eq!(out.len(), 2 * 4 * 2);
    }

    #[test]
    fn test_invalid_predictor_propagates() {
        let header = adpcm_header(1, 2, 1);
        let mut s = stream(header, &[0x7C, 0x00], StreamOptions::default());
        let mut buf = [0u8; 4];
        assert!(matches!(
            s.read(&mut buf),
            Err(DecodeError::InvalidPredictor { channel: 0, index: 7 })
        ));
        assert!(matches!(s.read(&mut buf), Err(DecodeError::Aborted)));
    }

    #[test]
    fn test_bad_block_returns_earlier_bytes_then_aborts() {
        let header = adpcm_header(1, 2, 3);
        let payload = [0x0C, 0x11, 0x7C, 0x00, 0x0C, 0x22];
        let mut s = stream(header, &payload, StreamOptions::default().with_buffer_blocks(1));

        let mut buf = [0u8; 8];
        assert_eq!(s.read(&mut buf).unwrap(), 4);
        assert_eq!(&buf[..4], &[1, 0, 1, 0]);

        assert!(matches!(
            s.read(&mut buf),
            Err(DecodeError::InvalidPredictor { channel: 0, index: 7 })
        ));
        // The block after the bad one is never decoded.
        assert!(matches!(s.read(&mut buf), Err(DecodeError::Aborted)));
        assert!(matches!(s.read(&mut buf), Err(DecodeError::Aborted)));
    }

    #[test]
    fn test_bad_block_mid_group_keeps_decoded_blocks() {
        let header = adpcm_header(1, 2, 4);
        let payload = [0x0C, 0x11, 0x0C, 0x33, 0x7C, 0x00, 0x0C, 0x22];
        let mut s = stream(header, &payload, StreamOptions::default().with_buffer_blocks(4));

        // Served in small pieces across calls, the two good blocks survive.
        let mut buf = [0u8; 3];
        assert_eq!(s.read(&mut buf).unwrap(), 3);
        assert_eq!(&buf, &[1, 0, 1]);
        assert_eq!(s.read(&mut buf).unwrap(), 3);
        assert_eq!(&buf, &[0, 3, 0]);
        assert_eq!(s.read(&mut buf).unwrap(), 2);
        assert_eq!(&buf[..2], &[3, 0]);

        assert!(matches!(
            s.read(&mut buf),
            Err(DecodeError::InvalidPredictor { .. })
        ));
        assert!(matches!(s.read(&mut buf), Err(DecodeError::Aborted)));
    }

    #[test]
    fn test_io_error_after_partial_pcm_read() {
        struct FailAfter {
            data: Cursor<Vec<u8>>,
        }

        impl Read for FailAfter {
            fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
                match self.data.read(buf)? {
                    0 => Err(io::Error::new(io::ErrorKind::ConnectionReset, "device gone")),
                    n => Ok(n),
                }
            }
        }

        let header = pcm_header(8);
        let mut bytes = header.to_bytes(ContainerVariant::SoundEffect).unwrap();
        bytes.extend_from_slice(&[1, 2, 3, 4]);
        let reader = FailAfter {
            data: Cursor::new(bytes),
        };
        let mut s = AudioStream::from_reader(reader, header, StreamOptions::default()).unwrap();

        let mut buf = [0u8; 8];
        assert_eq!(s.read(&mut buf).unwrap(), 4);
        assert_eq!(&buf[..4], &[1, 2, 3, 4]);
        assert!(matches!(s.read(&mut buf), Err(DecodeError::Io(_))));
        assert!(matches!(s.read(&mut buf), Err(DecodeError::Aborted)));
    }

    #[test]
    fn test_invalid_header_rejected() {
        let mut header = pcm_header(4);
        header.channels = 0;
        let bytes = file_bytes(&header, &[0; 4]);
        let result = AudioStream::from_reader(Cursor::new(bytes), header, StreamOptions::default());
        assert!(matches!(result, Err(DecodeError::InvalidHeader(_))));

        let mut header = pcm_header(4);
        header.sample_rate_high = -8000;
        let options = StreamOptions::default().with_wav_header(true);
        let result = AudioStream::from_reader(Cursor::new(Vec::new()), header, options);
        assert!(matches!(result, Err(DecodeError::InvalidHeader(_))));
    }

    #[test]
    fn test_adpcm_position_projection() {
        let header = adpcm_header(1, 28, 4);
        let payload = vec![0u8; 15 * 4];
        let mut s = stream(header, &payload, StreamOptions::default().with_buffer_blocks(1));
        assert_eq!(s.position(), 0);

        let mut buf = [0u8; 1];
        s.read(&mut buf).unwrap();
        // One 15-byte block consumed => 56 decoded bytes
        assert_eq!(s.position(), 56);
    }

    #[test]
    fn test_adpcm_position_with_wav_header() {
        let header = adpcm_header(2, 28, 4);
        let payload = vec![0u8; 30 * 4];
        let options = StreamOptions::default().with_wav_header(true).with_buffer_blocks(1);
        let mut s = stream(header, &payload, options);

        let mut buf = [0u8; 44];
        s.read(&mut buf).unwrap();
        assert_eq!(s.position(), 44);

        let mut one = [0u8; 1];
        s.read(&mut one).unwrap();
        assert_eq!(s.position(), 44 + 112);
    }

    #[test]
    fn test_unsupported_format_rejected() {
        let mut header = pcm_header(0);
        header.sample_format = SampleFormat::Atrac3;
        let result = AudioStream::from_reader(Cursor::new(Vec::new()), header, StreamOptions::default());
        assert!(matches!(
            result,
            Err(DecodeError::UnsupportedSampleFormat(SampleFormat::Atrac3))
        ));
    }

    #[test]
    fn test_close_is_idempotent() {
        let mut s = stream(pcm_header(4), &[1, 2, 3, 4], StreamOptions::default());
        assert!(!s.is_closed());
        s.close();
        s.close();
        assert!(s.is_closed());
        assert!(matches!(s.read(&mut [0u8; 4]), Err(DecodeError::Closed)));
    }

    #[test]
    fn test_io_read_adapter() {
        let payload = vec![9u8; 10];
        let mut s = stream(pcm_header(10), &payload, StreamOptions::default());
        let mut out = Vec::new();
        io::copy(&mut s, &mut out).unwrap();
        assert_eq!(out, payload);
    }

    #[test]
    fn test_short_file_is_empty_stream() {
        let header = adpcm_header(1, 2, 4);
        let mut s = AudioStream::from_reader(Cursor::new(vec![0u8; 10]), header, StreamOptions::default()).unwrap();
        assert_eq!(s.read(&mut [0u8; 8]).unwrap(), 0);
    }

    #[test]
    fn test_zero_buffer_blocks_clamped() {
        let header = adpcm_header(1, 2, 2);
        let mut s = stream(header, &constant_blocks(2, 1), StreamOptions::default().with_buffer_blocks(0));
        assert_eq!(read_all(&mut s, 64).len(), 8);
    }
}
