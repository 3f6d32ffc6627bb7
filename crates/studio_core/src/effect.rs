use crate::{FileHandle, UploadId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Settle the upload after a randomized delay.
    ScheduleSettle { id: UploadId },
    /// Pull text out of the primary file of a batch.
    ExtractText { file: FileHandle },
    /// Hand extracted text to the registered extraction callback.
    DeliverExtraction { text: String },
}
