//! Converter handle: one open primitive bound to an encoding pair.

use log::debug;

use crate::aliases::fix_encoding_name;
use crate::config::ConverterConfig;
use crate::engine;
use crate::error::Result;
use crate::iconv::Iconv;
use crate::primitive::Primitive;

/// Converts byte buffers from one encoding to another.
///
/// The encoding pair is fixed when the converter is created. Every call to
/// [`Converter::convert`] starts from a fresh shift state, so a converter can
/// be reused for any number of independent conversions.
///
/// A converter is `Send` but each conversion needs `&mut self`; share one
/// across threads behind a `Mutex`, or give each thread its own.
///
/// ```no_run
/// use transcode::Converter;
///
/// let mut converter = Converter::new("ISO-8859-1", "UTF8").unwrap();
/// let output = converter.convert(&[0x63, 0x61, 0x66, 0xE9]).unwrap();
/// assert_eq!(output, "café".as_bytes());
/// ```
#[derive(Debug)]
pub struct Converter<P = Iconv> {
    primitive: P,
    source: String,
    target: String,
    config: ConverterConfig,
}

impl Converter<Iconv> {
    /// Open a system converter from `source` to `target`.
    ///
    /// Argument order is (source, target), the reverse of `iconv_open`.
    /// Both names go through [`fix_encoding_name`] first.
    pub fn new(source: &str, target: &str) -> Result<Self> {
        Self::with_config(source, target, ConverterConfig::default())
    }

    /// Like [`Converter::new`], with explicit buffer sizing.
    pub fn with_config(source: &str, target: &str, config: ConverterConfig) -> Result<Self> {
        let source = fix_encoding_name(source);
        let target = fix_encoding_name(target);
        let primitive = Iconv::open(source, target)?;
        Ok(Self::from_primitive(primitive, source, target).config(config))
    }

    /// Release the system descriptor now instead of on drop.
    pub fn close(self) -> Result<()> {
        debug!("closing converter {} -> {}", self.source, self.target);
        self.primitive.close()
    }
}

impl<P: Primitive> Converter<P> {
    /// Wrap an already opened primitive.
    pub fn from_primitive(primitive: P, source: &str, target: &str) -> Self {
        Self {
            primitive,
            source: source.to_string(),
            target: target.to_string(),
            config: ConverterConfig::default(),
        }
    }

    /// Replace the buffer sizing policy.
    pub fn config(mut self, config: ConverterConfig) -> Self {
        self.config = config;
        self
    }

    /// Source encoding name, after alias fixup
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Target encoding name, after alias fixup
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Current buffer sizing policy
    pub fn buffer_config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Convert `input` in full.
    ///
    /// Returns exactly the converted bytes, including any trailing shift
    /// sequence the target encoding needs, or an error with no output.
    pub fn convert(&mut self, input: &[u8]) -> Result<Vec<u8>> {
        debug!(
            "converting {} bytes {} -> {}",
            input.len(),
            self.source,
            self.target
        );
        engine::convert(&mut self.primitive, input, self.config)
    }

    /// Convert the UTF-8 bytes of `input`.
    pub fn convert_str(&mut self, input: &str) -> Result<Vec<u8>> {
        self.convert(input.as_bytes())
    }

    /// Give back the underlying primitive.
    pub fn into_primitive(self) -> P {
        self.primitive
    }
}
