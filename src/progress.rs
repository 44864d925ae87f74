use std::io::{self, Write};

use tracing::debug;

/// 進捗の通知先
pub trait ProgressSink {
    fn start(&mut self, total: usize);
    /// 1件処理するごとに呼ばれる
    fn item(&mut self, percent: u8, status: &str);
    fn finish(&mut self);
}

// zenity --progress 互換の出力（数値行と "# " で始まる状態行）
pub struct ZenityProgress<W: Write> {
    out: W,
}

impl ZenityProgress<io::Stdout> {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> ZenityProgress<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, lines: &[String]) {
        // 読み手がいなくなっても処理は続ける
        let result = lines
            .iter()
            .try_for_each(|line| writeln!(self.out, "{}", line))
            .and_then(|()| self.out.flush());
        if let Err(e) = result {
            debug!(error = %e, "進捗出力失敗");
        }
    }
}

impl<W: Write> ProgressSink for ZenityProgress<W> {
    fn start(&mut self, total: usize) {
        self.emit(&[format!("# {} 個のファイルを解析中...", total)]);
    }

    fn item(&mut self, percent: u8, status: &str) {
        self.emit(&[percent.to_string(), format!("# {}", status)]);
    }

    fn finish(&mut self) {
        self.emit(&["100".to_string(), "# 完了".to_string()]);
    }
}

// 整数の進捗率（0..=100）
pub fn percent_complete(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    (done.min(total) * 100 / total) as u8
}
