//! Stream fabric: typed push connections between stages.
//!
//! Grounded on `Stream.h` (`StreamIn<T>` / `Connection<S>` /
//! `StreamOut<S>`) from the original implementation this spec was
//! distilled from. A [`Connection`] holds zero or more consumers of type
//! `T`; [`Connection::send`] visits them in the order they were
//! connected. All consumers but the last see a read-only slice; the last
//! is offered the batch as `&mut [T]` as a hint that it may reuse the
//! storage in place. The fabric itself never allocates, buffers or
//! threads — it is a synchronous fan-out.

/// A stage (or sink) that accepts batches of `T`.
///
/// `receive_mut` defaults to calling `receive` on a reborrowed slice;
/// override it only when in-place reuse of the buffer is worth the
/// complexity.
pub trait Sink<T> {
    /// Accept a read-only batch.
    fn receive(&mut self, batch: &[T]);

    /// Accept a batch the caller has offered as mutable. The default
    /// implementation just treats it as read-only.
    fn receive_mut(&mut self, batch: &mut [T]) {
        self.receive(batch);
    }
}

/// Fan-out connection from one producer port to zero or more consumers.
///
/// Connections are assembled before streaming starts (`connect`) and are
/// immutable once streaming begins; nothing here is safe to mutate from
/// more than one thread at a time.
pub struct Connection<T> {
    consumers: Vec<Box<dyn Sink<T>>>,
}

impl<T> Default for Connection<T> {
    fn default() -> Self {
        Self {
            consumers: Vec::new(),
        }
    }
}

impl<T> Connection<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new consumer. Connections are insertion-ordered.
    pub fn connect(&mut self, sink: Box<dyn Sink<T>>) {
        self.consumers.push(sink);
    }

    pub fn len(&self) -> usize {
        self.consumers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.consumers.is_empty()
    }

    /// Send a read-only batch to every consumer.
    pub fn send(&mut self, batch: &[T]) {
        for sink in self.consumers.iter_mut() {
            sink.receive(batch);
        }
    }

    /// Send a batch, offering the last consumer mutable access to the
    /// same storage (the "writable-last" convention of §4.1). Earlier
    /// consumers see it read-only.
    pub fn send_mut(&mut self, batch: &mut [T]) {
        let n = self.consumers.len();
        if n == 0 {
            return;
        }
        for sink in self.consumers[..n - 1].iter_mut() {
            sink.receive(batch);
        }
        self.consumers[n - 1].receive_mut(batch);
    }
}

/// A `Sink<T>` that just counts samples and tracks an exponentially
/// smoothed throughput estimate. Grounded on `IO::SampleCounter<T>`.
pub struct SampleCounter<T> {
    count: u64,
    last_count: u64,
    rate: f32,
    last_update: std::time::Instant,
    _marker: std::marker::PhantomData<T>,
}

impl<T> Default for SampleCounter<T> {
    fn default() -> Self {
        Self {
            count: 0,
            last_count: 0,
            rate: 0.0,
            last_update: std::time::Instant::now(),
            _marker: std::marker::PhantomData,
        }
    }
}

impl<T> SampleCounter<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    /// Update and return the smoothed sample rate in samples/second.
    pub fn rate(&mut self) -> f32 {
        let now = std::time::Instant::now();
        let seconds = (now - self.last_update).as_secs_f32().max(1e-9);
        let instantaneous = (self.count - self.last_count) as f32 / seconds;
        self.rate += 0.9 * (instantaneous - self.rate);
        self.last_update = now;
        self.last_count = self.count;
        self.rate
    }

    pub fn reset_statistic(&mut self) {
        self.count = 0;
        self.last_count = 0;
        self.last_update = std::time::Instant::now();
    }
}

impl<T> Sink<T> for SampleCounter<T> {
    fn receive(&mut self, batch: &[T]) {
        self.count += batch.len() as u64;
    }
}

/// A `Sink<T>` that writes every batch it receives to a file verbatim, as
/// raw little-endian bytes. Grounded on `IO::DumpFile<T>`: the writer is a
/// `BufWriter` constructed once in [`DumpFile::create`], so `receive`
/// never allocates or opens anything on the hot path, only appends to the
/// existing buffer and flushes it to the OS when that buffer fills.
pub struct DumpFile<T> {
    writer: std::io::BufWriter<std::fs::File>,
    bytes_written: u64,
    _marker: std::marker::PhantomData<T>,
}

impl<T> DumpFile<T> {
    pub fn create<P: AsRef<std::path::Path>>(path: P) -> std::io::Result<Self> {
        Ok(Self {
            writer: std::io::BufWriter::new(std::fs::File::create(path)?),
            bytes_written: 0,
            _marker: std::marker::PhantomData,
        })
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }
}

impl<T: Copy> Sink<T> for DumpFile<T> {
    fn receive(&mut self, batch: &[T]) {
        use std::io::Write;
        // SAFETY: `batch` is a valid, initialised slice of `T: Copy`; we
        // only read it as bytes for the duration of this call, the same
        // footprint `size_of_val` reports.
        let bytes = unsafe {
            std::slice::from_raw_parts(batch.as_ptr() as *const u8, std::mem::size_of_val(batch))
        };
        if let Err(e) = self.writer.write_all(bytes) {
            log::warn!("dump file write failed: {e}");
            return;
        }
        self.bytes_written += bytes.len() as u64;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Collect(Vec<i32>);
    impl Sink<i32> for Collect {
        fn receive(&mut self, batch: &[i32]) {
            self.0.extend_from_slice(batch);
        }
    }

    #[test]
    fn fan_out_preserves_batch_for_every_consumer() {
        let mut conn = Connection::new();
        let results = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));

        struct Tap(std::rc::Rc<std::cell::RefCell<Vec<i32>>>);
        impl Sink<i32> for Tap {
            fn receive(&mut self, batch: &[i32]) {
                self.0.borrow_mut().push(batch.iter().sum());
            }
        }

        conn.connect(Box::new(Tap(results.clone())));
        conn.connect(Box::new(Tap(results.clone())));
        conn.send(&[1, 2, 3]);
        assert_eq!(*results.borrow(), vec![6, 6]);
    }

    #[test]
    fn send_mut_offers_last_consumer_mutable_access() {
        let mut conn: Connection<i32> = Connection::new();

        struct Doubler;
        impl Sink<i32> for Doubler {
            fn receive(&mut self, _batch: &[i32]) {}
            fn receive_mut(&mut self, batch: &mut [i32]) {
                for x in batch.iter_mut() {
                    *x *= 2;
                }
            }
        }

        conn.connect(Box::new(Collect(Vec::new())));
        conn.connect(Box::new(Doubler));
        let mut batch = [1, 2, 3];
        conn.send_mut(&mut batch);
        assert_eq!(batch, [2, 4, 6]);
    }

    #[test]
    fn sample_counter_counts_across_batches() {
        let mut counter: SampleCounter<i32> = SampleCounter::new();
        counter.receive(&[1, 2, 3]);
        counter.receive(&[4, 5]);
        assert_eq!(counter.count(), 5);
    }

    #[test]
    fn dump_file_writes_batches_verbatim_and_tracks_byte_count() {
        let mut path = std::env::temp_dir();
        path.push(format!("ais_dsp_dump_file_test_{}", std::process::id()));

        {
            let mut dump: DumpFile<i32> = DumpFile::create(&path).unwrap();
            dump.receive(&[1, 2, 3]);
            dump.receive(&[4, 5]);
            assert_eq!(dump.bytes_written(), 5 * std::mem::size_of::<i32>() as u64);
        }

        let written = std::fs::read(&path).unwrap();
        let expected: Vec<u8> = [1i32, 2, 3, 4, 5]
            .iter()
            .flat_map(|x| x.to_ne_bytes())
            .collect();
        assert_eq!(written, expected);
        std::fs::remove_file(&path).unwrap();
    }
}
