use std::fmt;

/// A horizontal coordinate; `z` is the second axis because `y` is vertical.
#[derive(Clone, Copy, Debug, PartialEq, Hash, Eq, Default, PartialOrd, Ord)]
pub struct Vector2<T> {
    pub x: T,
    pub z: T,
}

impl<T> Vector2<T> {
    pub const fn new(x: T, z: T) -> Self {
        Vector2 { x, z }
    }
}

impl<T: fmt::Display> fmt::Display for Vector2<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::Vector2;

    #[test]
    fn display() {
        assert_eq!(Vector2::new(-3i16, 8).to_string(), "(-3,8)");
    }
}
