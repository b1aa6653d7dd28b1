/// Errors surfaced by the map generators. Queries never fail; out-of-bounds
/// reads return safe defaults instead.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MapgenError {
    InvalidConfig(&'static str),
    MapTooSmall { width: u32, height: u32 },
}
