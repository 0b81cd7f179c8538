//! Tagged argument codec for WASM contract calls.
//!
//! Arguments and return values travel as a flat byte stream of
//! `[tag][u32 le length][payload]` frames. The contract ABI declares the
//! type of each position; decoding with the wrong accessor is a client
//! programming error and surfaces as `ClientError::Decode`.

use crate::error::{ClientError, Result};

const TAG_U64: u8 = 0x01;
const TAG_STRING: u8 = 0x02;
const TAG_BYTES: u8 = 0x03;

/// Function name plus encoded positional arguments for a contract call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WasmParams {
    function: String,
    args: Vec<u8>,
}

impl WasmParams {
    pub fn new(function: impl Into<String>) -> Self {
        Self {
            function: function.into(),
            args: Vec::new(),
        }
    }

    /// Constructor parameters carry no function name.
    pub fn constructor() -> Self {
        Self::new("")
    }

    pub fn push_u64(mut self, value: u64) -> Self {
        put_frame(&mut self.args, TAG_U64, &value.to_le_bytes());
        self
    }

    pub fn push_string(mut self, value: &str) -> Self {
        put_frame(&mut self.args, TAG_STRING, value.as_bytes());
        self
    }

    pub fn push_bytes(mut self, value: &[u8]) -> Self {
        put_frame(&mut self.args, TAG_BYTES, value);
        self
    }

    pub fn function(&self) -> &str {
        &self.function
    }

    pub fn arg_bytes(&self) -> &[u8] {
        &self.args
    }

    pub fn into_arg_bytes(self) -> Vec<u8> {
        self.args
    }
}

fn put_frame(buf: &mut Vec<u8>, tag: u8, payload: &[u8]) {
    buf.push(tag);
    buf.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    buf.extend_from_slice(payload);
}

/// Positional decoder over contract output (or argument) bytes.
#[derive(Clone, Debug)]
pub struct WasmOutput {
    buf: Vec<u8>,
    pos: usize,
}

impl WasmOutput {
    pub fn new(buf: Vec<u8>) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn is_exhausted(&self) -> bool {
        self.pos >= self.buf.len()
    }

    pub fn take_u64(&mut self) -> Result<u64> {
        let payload = self.take_frame(TAG_U64)?;
        let arr: [u8; 8] = payload
            .try_into()
            .map_err(|_| ClientError::Decode("u64 frame must be 8 bytes".to_string()))?;
        Ok(u64::from_le_bytes(arr))
    }

    pub fn take_string(&mut self) -> Result<String> {
        let payload = self.take_frame(TAG_STRING)?;
        String::from_utf8(payload).map_err(|e| ClientError::Decode(e.to_string()))
    }

    pub fn take_bytes(&mut self) -> Result<Vec<u8>> {
        self.take_frame(TAG_BYTES)
    }

    fn take_frame(&mut self, want: u8) -> Result<Vec<u8>> {
        if self.pos + 5 > self.buf.len() {
            return Err(ClientError::Decode("output stream exhausted".to_string()));
        }
        let tag = self.buf[self.pos];
        if tag != want {
            return Err(ClientError::Decode(format!(
                "expected tag {want:#04x}, found {tag:#04x} at offset {}",
                self.pos
            )));
        }
        let len = u32::from_le_bytes(
            self.buf[self.pos + 1..self.pos + 5]
                .try_into()
                .map_err(|_| ClientError::Decode("truncated frame length".to_string()))?,
        ) as usize;
        let start = self.pos + 5;
        let end = start
            .checked_add(len)
            .filter(|&e| e <= self.buf.len())
            .ok_or_else(|| ClientError::Decode("frame length exceeds buffer".to_string()))?;
        self.pos = end;
        Ok(self.buf[start..end].to_vec())
    }
}

/// Encode a single return value the way the contract runtime does. Used by
/// the in-process test ledger; kept here so encoder and decoder stay one
/// codec.
pub fn encode_u64(value: u64) -> Vec<u8> {
    let mut buf = Vec::with_capacity(13);
    put_frame(&mut buf, TAG_U64, &value.to_le_bytes());
    buf
}

pub fn encode_string(value: &str) -> Vec<u8> {
    let mut buf = Vec::with_capacity(5 + value.len());
    put_frame(&mut buf, TAG_STRING, value.as_bytes());
    buf
}

pub fn encode_bytes(value: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(5 + value.len());
    put_frame(&mut buf, TAG_BYTES, value);
    buf
}
