mod locator;
mod normalize;
mod parser;

pub use locator::SectionLocator;
pub use normalize::LineNormalizer;
pub use parser::ReportParser;
