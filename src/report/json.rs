//! Flat JSON object writer over a [`Sink`].
//!
//! Emits straight to the transport, one key at a time. Nothing is buffered
//! beyond a single formatted number, and keys are firmware-image constants.

use embedded_hal::delay::DelayNs;

use crate::error::Result;
use crate::serial::{Sink, Transport};

/// Pause after each numeric array so the transmit buffer can drain.
const ARRAY_YIELD_MS: u32 = 1;

pub struct JsonWriter<'s, 'p, T: Transport, D: DelayNs> {
    sink: &'s mut Sink<'p, T>,
    delay: &'s mut D,
    first: bool,
}

impl<'s, 'p, T: Transport, D: DelayNs> JsonWriter<'s, 'p, T, D> {
    pub fn new(sink: &'s mut Sink<'p, T>, delay: &'s mut D) -> Self {
        Self {
            sink,
            delay,
            first: true,
        }
    }

    pub fn begin(&mut self) -> Result<()> {
        self.first = true;
        self.sink.write_char(b'{')
    }

    /// Close the object and terminate the record.
    pub fn end(&mut self) -> Result<()> {
        self.sink.write_char(b'}')?;
        self.sink.end_line()
    }

    /// `"name":`, preceded by a comma for every key but the first.
    pub fn key(&mut self, name: &'static str) -> Result<()> {
        if self.first {
            self.first = false;
        } else {
            self.sink.write_char(b',')?;
        }
        self.sink.write_char(b'"')?;
        self.sink.write_const(name)?;
        self.sink.write_const("\":")
    }

    /// String field whose value is a firmware-image constant.
    pub fn const_str_field(&mut self, name: &'static str, value: &'static str) -> Result<()> {
        self.key(name)?;
        self.sink.write_char(b'"')?;
        self.sink.write_const(value)?;
        self.sink.write_char(b'"')
    }

    /// String field whose value lives in RAM. Written verbatim, no escaping.
    pub fn str_field(&mut self, name: &'static str, value: &str) -> Result<()> {
        self.key(name)?;
        self.sink.write_char(b'"')?;
        self.sink.write_str(value)?;
        self.sink.write_char(b'"')
    }

    pub fn int_field(&mut self, name: &'static str, value: i32) -> Result<()> {
        self.key(name)?;
        self.sink.write_int(value)
    }

    pub fn float_field(&mut self, name: &'static str, value: f32) -> Result<()> {
        self.key(name)?;
        self.sink.write_float(value)
    }

    /// `"name":[a,b,...]` of floats, then a short cooperative pause.
    pub fn float_array(
        &mut self,
        name: &'static str,
        values: impl IntoIterator<Item = f32>,
    ) -> Result<()> {
        self.key(name)?;
        self.sink.write_char(b'[')?;
        for (i, v) in values.into_iter().enumerate() {
            if i > 0 {
                self.sink.write_char(b',')?;
            }
            self.sink.write_float(v)?;
        }
        self.sink.write_char(b']')?;
        self.delay.delay_ms(ARRAY_YIELD_MS);
        Ok(())
    }

    /// `"name":[d,d,...]` of single decimal digits.
    pub fn digit_array(
        &mut self,
        name: &'static str,
        digits: impl IntoIterator<Item = u8>,
    ) -> Result<()> {
        self.key(name)?;
        self.sink.write_char(b'[')?;
        for (i, d) in digits.into_iter().enumerate() {
            if i > 0 {
                self.sink.write_char(b',')?;
            }
            self.sink.write_char(b'0' + d.min(9))?;
        }
        self.sink.write_char(b']')
    }
}
