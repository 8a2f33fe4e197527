use super::{read_failure, Activate, ErrorSlot};
use crate::models::UserProfile;
use crate::services::Gateway;
use async_trait::async_trait;

const MERCHANT_PAGE_SIZE: u32 = 20;

/// Admin list of every merchant on the platform, one page at a time.
pub struct MerchantList {
    gateway: Gateway,
    /// Zero-based.
    pub page: u32,
    pub merchants: Vec<UserProfile>,
    pub total_elements: u64,
    pub total_pages: u32,
    pub error: ErrorSlot,
}

impl MerchantList {
    pub fn new(gateway: Gateway) -> Self {
        Self {
            gateway,
            page: 0,
            merchants: Vec::new(),
            total_elements: 0,
            total_pages: 0,
            error: ErrorSlot::default(),
        }
    }

    #[tracing::instrument(name = "merchant_list.load", skip(self), fields(page = self.page))]
    pub async fn load(&mut self) {
        self.error.clear();
        match self
            .gateway
            .ledger
            .merchants(self.page, MERCHANT_PAGE_SIZE)
            .await
        {
            Ok(page) => {
                self.total_elements = page.total_elements;
                self.total_pages = page.total_pages;
                self.merchants = page.content;
            }
            Err(e) => {
                self.merchants.clear();
                self.error.record(read_failure(&e, "Failed to load merchants"));
            }
        }
    }

    pub async fn go_to(&mut self, page: u32) {
        self.page = page;
        self.load().await;
    }

    pub fn has_next(&self) -> bool {
        self.page + 1 < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.page > 0
    }

    /// Returns false, without a request, on the last page.
    pub async fn next_page(&mut self) -> bool {
        if !self.has_next() {
            return false;
        }
        self.go_to(self.page + 1).await;
        true
    }

    pub async fn previous_page(&mut self) -> bool {
        if !self.has_previous() {
            return false;
        }
        self.go_to(self.page - 1).await;
        true
    }
}

#[async_trait]
impl Activate for MerchantList {
    async fn activate(&mut self) {
        self.load().await;
    }
}
