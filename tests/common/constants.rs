pub const BASE_URL: &str = "https://art.example.org";
pub const ROOT_PATH: &str = "/en/artists-by-art-movement";
pub const ERA: &str = "Modern Art";
