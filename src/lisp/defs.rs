/// Token for an absent node
pub(crate) const NIL: &str = "nil";

/// Opens a present node
pub(crate) const OPEN: u8 = b'(';

/// Closes a present node
pub(crate) const CLOSE: u8 = b')';

/// Bytes that end a bare token besides whitespace
pub(crate) const TOKEN_DELIMITERS: &[u8] = b"()";
