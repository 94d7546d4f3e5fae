/// Encodes pairs `(a, b)` with `b < width` as the single integer `a * width + b`.
///
/// Order pairs, agreement pairs and government pairs are all stored as elements of set variables
/// in this form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairCodec {
    width: u32,
}

impl PairCodec {
    pub fn new(width: u32) -> PairCodec {
        crate::xdg_assert_simple!(width > 0, "a pair codec needs a positive width");
        PairCodec { width }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn encode(&self, first: u32, second: u32) -> u32 {
        crate::xdg_assert_moderate!(second < self.width);
        first * self.width + second
    }

    pub fn decode(&self, code: u32) -> (u32, u32) {
        (code / self.width, code % self.width)
    }
}

#[cfg(test)]
mod tests {
    use super::PairCodec;

    #[test]
    fn pairs_survive_encoding() {
        let codec = PairCodec::new(7);
        assert_eq!(codec.encode(3, 6), 27);
        assert_eq!(codec.decode(27), (3, 6));
    }
}
