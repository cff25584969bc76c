mod screenshot;

#[cfg(test)]
mod tests;

pub use screenshot::*;
