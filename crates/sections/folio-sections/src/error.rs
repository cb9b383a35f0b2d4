use folio_motion_core::MotionError;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum SectionError {
    #[error(transparent)]
    Motion(#[from] MotionError),

    #[error("section '{0}' is not mounted")]
    NotMounted(&'static str),
}

pub type Result<T> = core::result::Result<T, SectionError>;
