mod field;
mod fields;

pub use self::field::Field;
pub use self::fields::Fields;
