//! 演示如何在 library 模式下使用 fm-assemble 进行定位与共识装配。
//!
//! 运行方式：
//! ```bash
//! cargo run --example simple_assemble
//! ```

use fm_assemble::assemble::{assemble, AssembleOpt};
use fm_assemble::codec::{Codec, PairCodec};
use fm_assemble::index::{FmIndex, FrameIndex, Locate, Scheme};

fn main() -> anyhow::Result<()> {
    // 1. 参考序列
    let reference = b"ACGTACGTAGCTGATCGTAGCTAGCTAGCTGATCGTAGCTAGCTAGCTGAT";
    println!("参考序列: {}", std::str::from_utf8(reference)?);
    println!("参考长度: {} bp", reference.len());

    // 2. 碱基对打包
    let codec = PairCodec::drop_odd();
    let packed = codec.pack_text(reference)?;
    println!("碱基对打包: {} 字节（含哨兵）, 还原: {}", packed.len(), codec.to_text(&packed)?);

    // 3. 构建 FM 索引并定位
    let fm = FmIndex::build(codec, reference, 16)?;
    let pattern = b"GCTGATCG";
    println!("'{}' 精确命中: {:?}", std::str::from_utf8(pattern)?, fm.locate(pattern, 0)?);
    println!("'{}' 1 错配命中: {:?}", std::str::from_utf8(pattern)?, fm.locate(pattern, 1)?);

    // 4. 三读框密码子索引，任意偏移都可达
    let frames = FrameIndex::codon(reference, 16)?;
    println!("三读框命中: {:?}", frames.locate(b"CTGATC", 0)?);

    // 5. 共识装配
    let reads: Vec<Vec<u8>> = vec![
        b"ACGTACGTAG".to_vec(),
        b"GCTGATCGTA".to_vec(),
        b"AGCTAGCTAG".to_vec(),
        b"CTGATCGTAGCTAGCTAG".to_vec(),
    ];
    let opt = AssembleOpt { scheme: Scheme::Codon, max_mismatches: 1, ..AssembleOpt::default() };
    let asm = assemble(reference, &reads, &opt)?;
    println!("共识序列: {}", String::from_utf8_lossy(&asm.consensus));
    println!("计票 read: {}/{}", asm.mapped_reads, reads.len());
    Ok(())
}
