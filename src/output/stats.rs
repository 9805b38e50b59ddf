//! Summary statistics for a crawl run

/// Counters accumulated over one crawl
#[derive(Debug, Clone, Default)]
pub struct CrawlStats {
    /// Nodes that were fetched and processed
    pub pages_succeeded: u64,

    /// Nodes whose fetch or processing failed
    pub pages_failed: u64,

    /// Nodes skipped because their normalized URL was already visited
    pub duplicates_skipped: u64,

    /// Nodes rejected at the depth bound, never fetched
    pub depth_exceeded: u64,

    /// Links discovered across all successful pages
    pub links_discovered: u64,

    /// Pages whose extracted text was written to disk
    pub text_files_written: u64,

    /// Distinct asset payloads saved
    pub files_downloaded: u64,

    /// Asset payloads discarded as content duplicates
    pub duplicate_files_skipped: u64,
}

impl CrawlStats {
    /// Total nodes that reached a terminal state
    pub fn total_nodes(&self) -> u64 {
        self.pages_succeeded + self.pages_failed + self.duplicates_skipped + self.depth_exceeded
    }

    /// Share of fetch attempts that succeeded, as a percentage
    pub fn success_rate(&self) -> f64 {
        let attempted = self.pages_succeeded + self.pages_failed;
        if attempted == 0 {
            return 0.0;
        }
        (self.pages_succeeded as f64 / attempted as f64) * 100.0
    }
}

/// Prints a human-readable statistics block to stdout.
pub fn print_statistics(stats: &CrawlStats) {
    println!("=== Crawl Statistics ===");
    println!("Pages succeeded:       {}", stats.pages_succeeded);
    println!("Pages failed:          {}", stats.pages_failed);
    println!("Duplicates skipped:    {}", stats.duplicates_skipped);
    println!("Depth-bounded nodes:   {}", stats.depth_exceeded);
    println!("Links discovered:      {}", stats.links_discovered);
    println!("Text files written:    {}", stats.text_files_written);
    println!("Assets downloaded:     {}", stats.files_downloaded);
    println!("Duplicate payloads:    {}", stats.duplicate_files_skipped);
    println!("Success rate:          {:.1}%", stats.success_rate());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_nodes() {
        let stats = CrawlStats {
            pages_succeeded: 5,
            pages_failed: 2,
            duplicates_skipped: 1,
            depth_exceeded: 3,
            ..Default::default()
        };
        assert_eq!(stats.total_nodes(), 11);
    }

    #[test]
    fn test_success_rate() {
        let stats = CrawlStats {
            pages_succeeded: 8,
            pages_failed: 2,
            ..Default::default()
        };
        assert!((stats.success_rate() - 80.0).abs() < 0.01);
    }

    #[test]
    fn test_success_rate_with_no_attempts() {
        assert_eq!(CrawlStats::default().success_rate(), 0.0);
    }
}
