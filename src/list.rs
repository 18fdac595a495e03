//! Attribute name list encodings
//!
//! The unified contract returns names as NUL-terminated strings packed back to
//! back, with the total byte length as the result. BSD `extattr_list_*` instead
//! produces one length byte followed by that many name bytes per entry; Solaris
//! produces directory entries that have to be packed by hand.

/// Rewrite a BSD length-prefixed name list into NUL-terminated names, in place.
///
/// Each entry `[len][name bytes]` becomes `[name bytes][0]`, which occupies the
/// same number of bytes, so the list never grows. A length byte that runs past
/// the end of `buf` is clamped to the bytes actually present.
pub fn convert_bsd_list(buf: &mut [u8]) {
    let mut offset = 0;
    while offset < buf.len() {
        let available = buf.len() - offset - 1;
        let len = usize::from(buf[offset]).min(available);
        buf.copy_within(offset + 1..offset + 1 + len, offset);
        buf[offset + len] = 0;
        offset += len + 1;
    }
}

/// Packs names into an optional caller buffer as NUL-terminated strings.
///
/// Names that do not fit are skipped, but their size is still counted, so
/// [`NameSink::finish`] always reports the length the full list needs.
#[derive(Debug)]
pub struct NameSink<'a> {
    buf: Option<&'a mut [u8]>,
    len: usize,
}

impl<'a> NameSink<'a> {
    /// Start packing into `buf`; `None` only measures.
    pub fn new(buf: Option<&'a mut [u8]>) -> Self {
        Self { buf, len: 0 }
    }

    /// Append one name followed by its terminator.
    pub fn push(&mut self, name: &[u8]) {
        let end = self.len + name.len() + 1;
        if let Some(buf) = self.buf.as_deref_mut() {
            if end <= buf.len() {
                buf[self.len..end - 1].copy_from_slice(name);
                buf[end - 1] = 0;
            }
        }
        self.len = end;
    }

    /// Total bytes the packed list needs, whether or not it all fit.
    pub fn finish(self) -> usize {
        self.len
    }
}

/// Iterator over the names of a NUL-terminated list
///
/// Empty entries are skipped; a trailing name without a terminator is still
/// yielded.
#[derive(Clone, Debug)]
pub struct Names<'a> {
    rest: &'a [u8],
}

impl<'a> Names<'a> {
    /// Decode the packed list in `buf`.
    pub fn new(buf: &'a [u8]) -> Self {
        Self { rest: buf }
    }
}

impl<'a> Iterator for Names<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        while !self.rest.is_empty() {
            let (name, rest) = match self.rest.iter().position(|&b| b == 0) {
                Some(nul) => (&self.rest[..nul], &self.rest[nul + 1..]),
                None => (self.rest, &[][..]),
            };
            self.rest = rest;
            if !name.is_empty() {
                return Some(name);
            }
        }
        None
    }
}
