use crate::helpers::LossyStr;

/// Capacity of the response buffer used by [`Sim800l`](crate::Sim800l)
/// unless another size is picked through its const parameter.
pub const RESPONSE_BUF_SIZE: usize = 128;

/// Fixed-capacity capture of the bytes the module sent back during the most
/// recent exchange.
///
/// Every receive overwrites the buffer from the start. A short read leaves
/// the tail untouched, so bytes past [`len`](Self::len) may belong to an
/// older exchange; [`raw`](Self::raw) exposes them, [`as_bytes`](Self::as_bytes)
/// does not.
#[derive(Clone, PartialEq, Eq)]
pub struct Response<const N: usize> {
    buf: [u8; N],
    len: usize,
}

impl<const N: usize> Response<N> {
    pub const fn new() -> Self {
        Self {
            buf: [0; N],
            len: 0,
        }
    }

    /// Bytes captured by the last receive.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// The last capture as text, if it is valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        core::str::from_utf8(self.as_bytes()).ok()
    }

    /// The whole buffer, including any stale tail.
    pub fn raw(&self) -> &[u8; N] {
        &self.buf
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether the last receive returned fewer bytes than the capacity.
    pub fn is_partial(&self) -> bool {
        self.len < N
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    pub(crate) fn buf_mut(&mut self) -> &mut [u8; N] {
        &mut self.buf
    }

    pub(crate) fn set_len(&mut self, len: usize) {
        self.len = len.min(N);
    }
}

impl<const N: usize> Default for Response<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> core::fmt::Debug for Response<N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Response")
            .field("len", &self.len)
            .field("data", &LossyStr(self.as_bytes()))
            .finish()
    }
}

#[cfg(feature = "defmt")]
impl<const N: usize> defmt::Format for Response<N> {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "Response(len={}, data={:?})",
            self.len,
            LossyStr(self.as_bytes())
        )
    }
}
