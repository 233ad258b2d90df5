/// Opaque categorical key read from source data.
/// Examples: `17` (raw user id), `2571` (raw movie id), `Sci-Fi` (genre name)
pub type EntityKey = String;
/// Dense zero-based user identifier assigned by the user registry.
pub type UserId = usize;
/// Dense zero-based movie identifier assigned by the movie registry.
pub type MovieId = usize;
/// Dense zero-based genre identifier assigned by the genre registry.
pub type GenreId = usize;
/// Rating value kept verbatim from the rating source.
/// Examples: `4.0`, `3.5`
pub type RawRating = String;
/// Seconds since the dataset's earliest event.
pub type Timestamp = u64;
/// Global feature index in the sparse output space.
pub type FeatureIndex = usize;
/// Field index used by field-aware output.
pub type FieldIndex = usize;
/// Name of an input being read, used in error and log context.
/// Examples: `movies.csv`, `ratings.csv`
pub type SourceName = String;
