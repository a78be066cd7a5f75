pub mod document;

pub use document::{
    Column, ContentSection, CustomSection, CustomSectionItem, FieldValue, HeaderConfig, Item,
    PersonalInfoField, ResumeDocument, SectionLayout,
};
