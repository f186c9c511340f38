use kernel::KernelError;

/// Maps a backend-specific error into a [`KernelError`] report.
pub trait ConvertError {
    type Ok;
    fn convert_error(self) -> error_stack::Result<Self::Ok, KernelError>;
}
