use rand::{RngCore, SeedableRng};

/// Seeded Mulberry32 stream. Every random decision made while generating a
/// map is drawn from one of these, so a seed fully determines the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mulberry32 {
    state: u32,
}

impl Mulberry32 {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    fn advance(&mut self) -> u32 {
        self.state = self.state.wrapping_add(0x6D2B_79F5);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        t ^ (t >> 14)
    }

    /// Next value in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        self.advance() as f64 / 4_294_967_296.0
    }

    /// `floor(next_f64() * n)`, i.e. a uniform index into a slice of length `n`.
    pub fn below(&mut self, n: usize) -> usize {
        ((self.next_f64() * n as f64).floor() as usize).min(n.saturating_sub(1))
    }

    /// Uniform value in `[-0.5, 0.5)`.
    pub fn centered(&mut self) -> f64 {
        self.next_f64() - 0.5
    }

    /// Weighted pick over `(item, weight)` pairs by running subtraction: the
    /// first item that brings the remaining threshold to zero or below wins.
    /// Floating point can leave a sliver of threshold unconsumed; the first
    /// item is returned in that case. `None` only for an empty slice.
    pub fn pick_weighted<T: Copy>(&mut self, weighted: &[(T, f64)]) -> Option<T> {
        let (first, _) = *weighted.first()?;
        let total: f64 = weighted.iter().map(|(_, w)| w).sum();
        let mut remaining = self.next_f64() * total;
        for &(item, weight) in weighted {
            remaining -= weight;
            if remaining <= 0.0 {
                return Some(item);
            }
        }
        Some(first)
    }
}

impl RngCore for Mulberry32 {
    fn next_u32(&mut self) -> u32 {
        self.advance()
    }

    fn next_u64(&mut self) -> u64 {
        let high = self.advance() as u64;
        let low = self.advance() as u64;
        (high << 32) | low
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.advance().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for Mulberry32 {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u32::from_le_bytes(seed))
    }

    /// Keeps the low 32 bits so `seed_from_u64(n)` and `new(n as u32)` agree.
    fn seed_from_u64(state: u64) -> Self {
        Self::new(state as u32)
    }
}
