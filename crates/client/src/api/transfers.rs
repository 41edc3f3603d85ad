use api_types::transfer::{TransferNew, TransferReceipt};

use crate::{error::Result, http::ApiClient};

impl ApiClient {
    /// Submits a cross-budget transfer once; the server atomically creates
    /// the paired debit/credit entries and reports both in the receipt.
    pub async fn create_transfer(&self, transfer: &TransferNew) -> Result<TransferReceipt> {
        self.post_json("/api/transfers", transfer).await
    }
}
