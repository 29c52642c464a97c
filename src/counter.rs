use std::io::{self, BufRead, Read, Write};

/// Reader that tallies the bytes handed out to its consumer.
///
/// Wrap it around the buffer, not under it: only bytes returned by `read` or
/// released through `consume` are counted, so read-ahead is never included.
#[derive(Debug)]
pub(crate) struct CountingReader<R> {
    inner: R,
    count: u64,
}

impl<R> CountingReader<R> {
    pub(crate) fn new(inner: R) -> Self {
        Self { inner, count: 0 }
    }

    pub(crate) fn bytes_read(&self) -> u64 {
        self.count
    }
}

impl<R: Read> Read for CountingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.count += n as u64;
        Ok(n)
    }
}

impl<R: BufRead> BufRead for CountingReader<R> {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.inner.fill_buf()
    }

    fn consume(&mut self, amt: usize) {
        self.count += amt as u64;
        self.inner.consume(amt);
    }
}

#[derive(Debug)]
pub(crate) struct CountingWriter<W> {
    inner: W,
    count: u64,
}

impl<W> CountingWriter<W> {
    pub(crate) fn new(inner: W) -> Self {
        Self { inner, count: 0 }
    }

    pub(crate) fn bytes_written(&self) -> u64 {
        self.count
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.count += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_counts_consumed_not_buffered() -> io::Result<()> {
        let data = b"version 2.00\nrest of the stream";
        let mut reader = CountingReader::new(io::BufReader::new(&data[..]));

        let mut line = Vec::new();
        reader.read_until(b'\n', &mut line)?;
        assert_eq!(reader.bytes_read(), 13);

        let mut two = [0u8; 2];
        reader.read_exact(&mut two)?;
        assert_eq!(reader.bytes_read(), 15);
        Ok(())
    }

    #[test]
    fn test_counts_partial_writes() -> io::Result<()> {
        let mut sink = [0u8; 4];
        let mut writer = CountingWriter::new(&mut sink[..]);
        writer.write_all(b"ab")?;
        assert_eq!(writer.bytes_written(), 2);

        // only two bytes of room remain
        assert!(writer.write_all(b"cdef").is_err());
        assert_eq!(writer.bytes_written(), 4);
        Ok(())
    }
}
