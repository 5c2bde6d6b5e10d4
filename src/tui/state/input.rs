//! 自定义名称输入状态

use unicode_width::UnicodeWidthStr;

/// 单行文本输入，光标以字节偏移表示
#[derive(Debug, Default, Clone)]
pub struct InputState {
    buffer: String,
    cursor: usize,
}

impl InputState {
    /// 使用初始值创建，光标位于末尾
    pub fn with_value(value: &str) -> Self {
        Self {
            buffer: value.to_string(),
            cursor: value.len(),
        }
    }

    /// 清空输入
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
    }

    /// 取出输入内容并清空
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.buffer)
    }

    /// 插入字符
    pub fn insert_char(&mut self, c: char) {
        self.buffer.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    fn prev_char_len(&self) -> usize {
        self.buffer[..self.cursor]
            .chars()
            .last()
            .map_or(0, char::len_utf8)
    }

    fn next_char_len(&self) -> usize {
        self.buffer[self.cursor..]
            .chars()
            .next()
            .map_or(0, char::len_utf8)
    }

    /// 删除光标前字符
    pub fn delete_before_cursor(&mut self) {
        let len = self.prev_char_len();
        if len > 0 {
            self.cursor -= len;
            self.buffer.remove(self.cursor);
        }
    }

    /// 删除光标后字符
    pub fn delete_after_cursor(&mut self) {
        if self.next_char_len() > 0 {
            self.buffer.remove(self.cursor);
        }
    }

    /// 光标左移
    pub fn move_cursor_left(&mut self) {
        self.cursor -= self.prev_char_len();
    }

    /// 光标右移
    pub fn move_cursor_right(&mut self) {
        self.cursor += self.next_char_len();
    }

    /// 移动到行首
    pub fn move_cursor_to_start(&mut self) {
        self.cursor = 0;
    }

    /// 移动到行尾
    pub fn move_cursor_to_end(&mut self) {
        self.cursor = self.buffer.len();
    }

    /// 光标可视位置（按显示宽度）
    pub fn visual_cursor_position(&self) -> usize {
        self.buffer[..self.cursor].width()
    }

    /// 获取当前值
    pub fn value(&self) -> &str {
        &self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_editing_multibyte() {
        let mut input = InputState::with_value("海边");
        assert_eq!(input.visual_cursor_position(), 4);

        input.move_cursor_left();
        input.insert_char('_');
        assert_eq!(input.value(), "海_边");

        input.delete_before_cursor();
        input.delete_after_cursor();
        assert_eq!(input.value(), "海");

        input.move_cursor_to_start();
        input.delete_before_cursor();
        input.insert_char('a');
        input.move_cursor_to_end();
        input.move_cursor_right();
        assert_eq!(input.value(), "a海");
        assert_eq!(input.take(), "a海");
        assert_eq!(input.value(), "");
    }
}
