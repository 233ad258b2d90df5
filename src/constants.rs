/// Constants describing the on-disk dataset layout.
pub mod dataset {
    /// Default dataset directory (the MovieLens "latest small" extract).
    pub const DEFAULT_DATASET_DIR: &str = "ml-latest-small/";
    /// Movie file name inside the dataset directory.
    pub const MOVIES_FILE: &str = "movies.csv";
    /// Rating file name inside the dataset directory.
    pub const RATINGS_FILE: &str = "ratings.csv";
    /// Expected column count of a movie row: `movieId,title,genres`.
    pub const MOVIE_COLUMNS: usize = 3;
    /// Expected column count of a rating row: `userId,movieId,rating,timestamp`.
    pub const RATING_COLUMNS: usize = 4;
    /// Separator between genre names in the movie genre column.
    pub const GENRE_DELIMITER: char = '|';
}

/// Constants used by the line encoder.
pub mod encoding {
    /// Decimal places used for every fractional feature value.
    pub const VALUE_PRECISION: usize = 4;
    /// Divisor turning normalized seconds into hours.
    pub const SECONDS_PER_HOUR: f64 = 3600.0;
    /// Separator between the parts of one feature token.
    pub const TOKEN_SEPARATOR: char = ':';
}

/// Constants used when writing fold files.
pub mod output {
    /// Default output directory.
    pub const DEFAULT_OUTPUT_DIR: &str = "output";
    /// Default file name prefix for training files.
    pub const DEFAULT_TRAIN_PREFIX: &str = "train_";
    /// Default file name prefix for test files.
    pub const DEFAULT_TEST_PREFIX: &str = "test_";
    /// Extension appended to every fold file.
    pub const FOLD_FILE_EXTENSION: &str = "txt";
    /// File name of the feature layout manifest.
    pub const LAYOUT_MANIFEST_FILE: &str = "layout.json";
    /// Default number of cross-validation folds.
    pub const DEFAULT_FOLDS: usize = 5;
}
