use byteorder::{ByteOrder, LittleEndian};
use sqlx::FromRow;

use crate::error::StoreError;

/// 图片记录
#[derive(Debug, Clone, FromRow)]
pub struct ImageRecord {
    /// 图片 ID
    pub id: i64,
    /// 原始文件名，包含扩展名
    pub filename: String,
    /// 入库时推导出的病症标签
    pub condition: String,
    /// 小端序 f32 嵌入向量
    pub embedding: Vec<u8>,
}

impl ImageRecord {
    pub fn vector(&self) -> Result<Vec<f32>, StoreError> {
        decode_vector(&self.embedding)
    }
}

/// 不含向量的图片信息
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct ImageInfo {
    pub id: i64,
    pub filename: String,
    pub condition: String,
}

/// 每个病症标签的图片数量
#[derive(Debug, Clone, PartialEq, FromRow, serde::Serialize)]
pub struct ConditionCount {
    pub condition: String,
    pub count: i64,
}

pub fn encode_vector(vector: &[f32]) -> Vec<u8> {
    let mut buf = vec![0u8; vector.len() * 4];
    LittleEndian::write_f32_into(vector, &mut buf);
    buf
}

pub fn decode_vector(bytes: &[u8]) -> Result<Vec<f32>, StoreError> {
    if bytes.len() % 4 != 0 {
        return Err(StoreError::CorruptEmbedding(bytes.len()));
    }
    let mut vector = vec![0f32; bytes.len() / 4];
    LittleEndian::read_f32_into(bytes, &mut vector);
    Ok(vector)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vector_blob() {
        let v = vec![0.25f32, -1.5, 3.0];
        let blob = encode_vector(&v);
        assert_eq!(blob.len(), 12);
        assert_eq!(&blob[..4], &0.25f32.to_le_bytes());
        assert_eq!(decode_vector(&blob).unwrap(), v);
    }

    #[test]
    fn corrupt_blob() {
        assert!(matches!(decode_vector(&[0, 1, 2]), Err(StoreError::CorruptEmbedding(3))));
    }
}
