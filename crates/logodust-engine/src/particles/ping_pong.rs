/// Two fixed slots and one index bit.
///
/// `read()` is the slot the next pass consumes; `write()` is the other one.
/// [`swap`](Self::swap) flips the roles once a pass has been recorded.
#[derive(Debug)]
pub struct PingPong<T> {
    slots: [T; 2],
    read: usize,
}

impl<T> PingPong<T> {
    pub fn new(first: T, second: T) -> Self {
        Self {
            slots: [first, second],
            read: 0,
        }
    }

    pub fn read(&self) -> &T {
        &self.slots[self.read]
    }

    pub fn write(&self) -> &T {
        &self.slots[1 - self.read]
    }

    /// Index (0 or 1) of the current read slot.
    pub fn read_index(&self) -> usize {
        self.read
    }

    pub fn slot(&self, index: usize) -> &T {
        &self.slots[index & 1]
    }

    pub fn swap(&mut self) {
        self.read = 1 - self.read;
    }

    /// Makes the first slot the read slot again.
    pub fn reset(&mut self) {
        self.read = 0;
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.slots.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_and_write_never_alias() {
        let mut pp = PingPong::new('a', 'b');
        for _ in 0..5 {
            assert_ne!(pp.read(), pp.write());
            pp.swap();
        }
    }

    #[test]
    fn after_n_swaps_read_is_n_mod_2() {
        let mut pp = PingPong::new(0u8, 1u8);
        for n in 1..=9usize {
            pp.swap();
            assert_eq!(pp.read_index(), n % 2);
            assert_eq!(*pp.read() as usize, n % 2);
        }
    }

    #[test]
    fn reset_returns_to_first_slot() {
        let mut pp = PingPong::new("first", "second");
        pp.swap();
        pp.reset();
        assert_eq!(*pp.read(), "first");
        assert_eq!(*pp.write(), "second");
    }
}
