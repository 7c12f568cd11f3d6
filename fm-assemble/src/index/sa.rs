/// 构建后缀数组（倍增法，每轮一次比较排序）。
/// 输入为打包后的编码文本，末尾必须恰好有一个哨兵单元（0），
/// 因此后缀比较在越过文本末尾前必然分出大小，按旋转排序与按后缀排序结果一致。
pub fn build_sa(text: &[u8]) -> Vec<u32> {
    let n = text.len();
    if n == 0 {
        return Vec::new();
    }
    let mut sa: Vec<usize> = (0..n).collect();
    let mut rank: Vec<i64> = text.iter().map(|&b| i64::from(b)).collect();
    let mut tmp: Vec<i64> = vec![0; n];

    let mut k = 1usize;
    loop {
        // 越过末尾的后半段记为 -1，排在所有编码之前
        let key = |i: usize, rank: &[i64]| (rank[i], if i + k < n { rank[i + k] } else { -1 });
        sa.sort_unstable_by_key(|&i| key(i, &rank));

        tmp[sa[0]] = 0;
        for w in 1..n {
            let (a, b) = (sa[w - 1], sa[w]);
            tmp[b] = tmp[a] + i64::from(key(a, &rank) != key(b, &rank));
        }
        rank.copy_from_slice(&tmp);

        if rank[sa[n - 1]] as usize == n - 1 || k >= n {
            break;
        }
        k <<= 1;
    }

    sa.into_iter().map(|x| x as u32).collect()
}

/// 朴素比较排序：直接按编码逐字节比较整个后缀，O(n² log n)。
/// 结果与 [`build_sa`] 完全一致，用于小输入与校验。
pub fn build_sa_naive(text: &[u8]) -> Vec<u32> {
    let mut sa: Vec<u32> = (0..text.len() as u32).collect();
    sa.sort_unstable_by(|&a, &b| text[a as usize..].cmp(&text[b as usize..]));
    sa
}
