use crate::domain::summary::{SummaryLine, SummaryView};
use crate::error::Result;
use std::io::Write;

/// Writes an order summary as `label,value` CSV rows.
pub struct SummaryWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> SummaryWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_summary(&mut self, view: &SummaryView) -> Result<()> {
        self.writer.write_record(["label", "value"])?;
        match view {
            SummaryView::Ready(summary) => {
                for SummaryLine { label, value } in summary.rows() {
                    self.writer.write_record([label.as_str(), value.as_str()])?;
                }
                self.writer
                    .write_record(["Payment Schedule", summary.payment_schedule])?;
                if summary.auto_renewal {
                    self.writer
                        .write_record(["Auto-renewal", "Yes, cancel anytime"])?;
                }
                self.writer
                    .write_record(["Refund Policy", summary.refund_policy])?;
            }
            SummaryView::Pending { prompt } => {
                self.writer.write_record(["Total", *prompt])?;
            }
        }
        self.writer.flush()?;
        Ok(())
    }
}
