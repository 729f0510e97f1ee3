//! Frame sampling

/// Iterator over every Nth frame, yielding `(frame_index, frame)`
#[derive(Debug, Clone)]
pub struct SampledFrames<I> {
    inner: I,
    stride: usize,
    next_index: usize,
}

/// Keep frames whose 0-based index is a multiple of `stride`.
///
/// A stride of 0 behaves like 1.
pub fn sample_every<I: IntoIterator>(frames: I, stride: usize) -> SampledFrames<I::IntoIter> {
    SampledFrames {
        inner: frames.into_iter(),
        stride: stride.max(1),
        next_index: 0,
    }
}

impl<I> SampledFrames<I> {
    /// Number of frames pulled from the underlying source so far
    pub fn frames_read(&self) -> usize {
        self.next_index
    }
}

impl<I: Iterator> Iterator for SampledFrames<I> {
    type Item = (usize, I::Item);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let frame = self.inner.next()?;
            let index = self.next_index;
            self.next_index += 1;

            if index % self.stride == 0 {
                return Some((index, frame));
            }
        }
    }
}
