pub mod manifest;

#[cfg(test)]
mod tests;
