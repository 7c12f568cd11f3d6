//! # fm-assemble
//!
//! 基于 FM 索引的短片段映射与多数投票共识装配。
//!
//! 本 crate 包括：
//!
//! - **字母表编码**：字节、碱基对（每字节两个）、密码子（每字节三个）三种打包方案
//! - **索引构建**：打包文本 -> 后缀数组 -> BWT -> C / Occ 秩表
//! - **近似定位**：允许有限个替换错配的反向回溯搜索，以及三读框复用
//! - **共识装配**：并行映射 read，逐位置多数投票得到共识序列
//!
//! ## 快速示例
//!
//! ```rust
//! use fm_assemble::codec::RawCodec;
//! use fm_assemble::index::{FmIndex, Locate};
//! use fm_assemble::assemble::{assemble, AssembleOpt};
//!
//! let reference = b"ACGTACGTAGCTGATCGTAG";
//! let fm = FmIndex::build(RawCodec, reference, 16).unwrap();
//!
//! // 精确匹配与一个错配
//! assert_eq!(fm.locate(b"GCTGATC", 0).unwrap(), vec![9]);
//! assert!(fm.locate(b"GCTCATC", 1).unwrap().contains(&9));
//!
//! // 装配
//! let reads = vec![b"ACGTAC".to_vec(), b"AGCTGA".to_vec()];
//! let opt = AssembleOpt { max_mismatches: 1, ..AssembleOpt::default() };
//! let asm = assemble(reference, &reads, &opt).unwrap();
//! assert_eq!(asm.consensus.len(), reference.len());
//! ```
//!
//! ## 模块说明
//!
//! - [`codec`] — 符号编码与三种打包方案
//! - [`index`] — 后缀数组、BWT、秩表、FM 索引、读框复用器
//! - [`assemble`] — read 映射、投票表、装配流程与耗时统计
//! - [`io`] — 参考序列 / read 文件读取与结果写出
//! - [`util`] — 碱基规范化与 2-bit 编码

pub mod assemble;
pub mod codec;
pub mod index;
pub mod io;
pub mod util;
