pub enum TextSource {
    Fixed(String),
    Labels(Vec<String>),
}
