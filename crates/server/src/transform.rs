//! Payload transforms applied before echoing a datagram back.

/// Turns a received payload into the reply payload.
pub trait PayloadTransform: Send + 'static {
    fn apply(&self, payload: &[u8]) -> Vec<u8>;
}

impl<F> PayloadTransform for F
where
    F: Fn(&[u8]) -> Vec<u8> + Send + 'static,
{
    fn apply(&self, payload: &[u8]) -> Vec<u8> {
        self(payload)
    }
}

/// ISO-8859-1 uppercase, one byte in, one byte out.
///
/// Latin-1 letters whose uppercase form lies outside Latin-1 (`ß`, `ÿ`, `µ`)
/// are left unchanged so the reply has the same length as the request.
#[derive(Debug, Clone, Copy, Default)]
pub struct Uppercase;

impl PayloadTransform for Uppercase {
    fn apply(&self, payload: &[u8]) -> Vec<u8> {
        payload.iter().map(|&b| latin1_to_upper(b)).collect()
    }
}

fn latin1_to_upper(b: u8) -> u8 {
    match b {
        b'a'..=b'z' => b - 0x20,
        // à..þ except ÷
        0xE0..=0xFE if b != 0xF7 => b - 0x20,
        _ => b,
    }
}

/// Render bytes as ISO-8859-1 text (every byte maps to one char).
pub fn latin1_text(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}
